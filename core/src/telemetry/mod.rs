pub mod log;
pub mod metrics;

pub use self::log::TraceLog;
pub use self::metrics::{FeedMetrics, MetricsSnapshot};
