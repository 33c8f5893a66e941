pub mod dispatch;
pub mod state;

pub use dispatch::CommandDispatcher;
pub use state::{PanelEffect, PanelEvent, PanelState};
