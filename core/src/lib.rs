//! Coordinate-polling and overlay core for the robo-foosball control panel.
//!
//! The modules model the table backend's wire contracts, the polling loop
//! that feeds ball telemetry to the panel, the reducer that owns all panel
//! state, and the projection that places the marker over the field image.

pub mod config;
pub mod panel;
pub mod poller;
pub mod prelude;
pub mod projection;
pub mod table;
pub mod telemetry;

pub use prelude::{BackendError, BackendResult, CoordinateSource};
