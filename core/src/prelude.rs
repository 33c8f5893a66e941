use async_trait::async_trait;

use crate::table::Coordinate;

/// Common error type for backend interactions.
///
/// Every failure class collapses to the same user-visible behavior (a generic
/// status message plus retained last-known state); the variants exist so the
/// log can tell a rejected request from a malformed body.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("decode failure: {0}")]
    Decode(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// One coordinate fetch per poll tick; implementations must not retry
/// internally, a missed tick is simply superseded by the next one.
#[async_trait]
pub trait CoordinateSource: Send + Sync {
    async fn fetch(&self) -> BackendResult<Coordinate>;
}
