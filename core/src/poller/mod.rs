pub mod client;
pub mod service;

pub use client::CoordinateClient;
pub use service::{CoordinateFeed, CoordinatePoller, PollerHandle};
