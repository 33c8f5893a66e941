pub mod command;
pub mod coordinate;

pub use command::{
    endpoint_url, CommandKind, CommandRequest, COORDINATES_ROUTE, DEFAULT_HARDWARE_TYPE,
};
pub use coordinate::Coordinate;
