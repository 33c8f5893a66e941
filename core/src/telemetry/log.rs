use log::{debug, info, warn};

use crate::prelude::BackendError;
use crate::table::{CommandKind, Coordinate};

/// Trace points for the polling and command paths. Failure details go here
/// and nowhere else; the panel shows a single generic status message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLog;

impl TraceLog {
    pub fn new() -> Self {
        Self
    }

    pub fn poll_applied(&self, seq: u64, coordinate: Coordinate) {
        debug!(
            "poll {} applied at ({:.1}, {:.1})",
            seq, coordinate.x, coordinate.y
        );
    }

    pub fn poll_failed(&self, seq: u64, error: &BackendError) {
        warn!("poll {} failed, keeping last coordinate: {}", seq, error);
    }

    pub fn tick_skipped(&self, pending_seq: u64) {
        debug!("tick skipped, poll {} still in flight", pending_seq);
    }

    pub fn command_sent(&self, kind: CommandKind) {
        info!("{} command acknowledged", kind.action());
    }

    pub fn command_failed(&self, kind: CommandKind, error: &BackendError) {
        warn!("{} command failed: {}", kind.action(), error);
    }
}
