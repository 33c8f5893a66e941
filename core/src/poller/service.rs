use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::prelude::CoordinateSource;
use crate::table::Coordinate;
use crate::telemetry::{FeedMetrics, TraceLog};

/// Latest published coordinate plus the issue-order sequence number of the
/// poll that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateFeed {
    pub coordinate: Coordinate,
    pub seq: u64,
}

/// Polls a coordinate source on a fixed interval and publishes the latest
/// value to subscribers.
///
/// The loop awaits each fetch before the next tick, so at most one request
/// is in flight and published sequence numbers only grow. A failed poll
/// publishes nothing; subscribers keep the previous value until the next
/// successful tick.
pub struct CoordinatePoller {
    source: Arc<dyn CoordinateSource>,
    interval: Duration,
    metrics: Arc<FeedMetrics>,
    trace: TraceLog,
}

impl CoordinatePoller {
    pub fn new(source: Arc<dyn CoordinateSource>, interval: Duration) -> Self {
        Self::with_metrics(source, interval, Arc::new(FeedMetrics::new()))
    }

    pub fn with_metrics(
        source: Arc<dyn CoordinateSource>,
        interval: Duration,
        metrics: Arc<FeedMetrics>,
    ) -> Self {
        Self {
            source,
            interval,
            metrics,
            trace: TraceLog::new(),
        }
    }

    pub fn metrics(&self) -> Arc<FeedMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Starts the poll loop. Dropping (or shutting down) the returned handle
    /// stops the loop; nothing is published afterwards.
    pub fn spawn(self) -> PollerHandle {
        let (sender, receiver) = watch::channel(CoordinateFeed::default());
        let task = tokio::spawn(poll_loop(
            self.source,
            self.interval,
            self.metrics,
            self.trace,
            sender,
        ));
        PollerHandle {
            updates: receiver,
            task,
        }
    }
}

async fn poll_loop(
    source: Arc<dyn CoordinateSource>,
    interval: Duration,
    metrics: Arc<FeedMetrics>,
    trace: TraceLog,
    sender: watch::Sender<CoordinateFeed>,
) {
    let mut ticker = time::interval(interval);
    // A slow fetch delays the following tick instead of bursting to catch up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq: u64 = 0;

    loop {
        ticker.tick().await;
        seq += 1;
        match source.fetch().await {
            Ok(coordinate) => {
                metrics.record_poll_ok();
                trace.poll_applied(seq, coordinate);
                if sender.send(CoordinateFeed { coordinate, seq }).is_err() {
                    // Every subscriber is gone; stop polling.
                    return;
                }
            }
            Err(error) => {
                metrics.record_poll_failed();
                trace.poll_failed(seq, &error);
            }
        }
    }
}

/// Subscription side of a running poll loop.
pub struct PollerHandle {
    updates: watch::Receiver<CoordinateFeed>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Most recently published feed value. Sequence 0 means no poll has
    /// succeeded yet; the coordinate then holds its `(0, 0)` default.
    pub fn latest(&self) -> CoordinateFeed {
        *self.updates.borrow()
    }

    /// Waits for a feed value newer than the last one seen. Returns `false`
    /// once the loop has stopped.
    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<CoordinateFeed> {
        self.updates.clone()
    }

    /// Stops the poll loop immediately.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    use crate::prelude::{BackendError, BackendResult};

    /// Scripted source: succeeds for the first `ok_polls` fetches, then
    /// fails every time.
    struct ScriptedSource {
        calls: AtomicU64,
        ok_polls: u64,
    }

    impl ScriptedSource {
        fn new(ok_polls: u64) -> Self {
            Self {
                calls: AtomicU64::new(0),
                ok_polls,
            }
        }
    }

    #[async_trait]
    impl CoordinateSource for ScriptedSource {
        async fn fetch(&self) -> BackendResult<Coordinate> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.ok_polls {
                Ok(Coordinate::new(call as f64 * 10.0, call as f64))
            } else {
                Err(BackendError::Status(500))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_decoded_values_in_issue_order() {
        let poller = CoordinatePoller::new(
            Arc::new(ScriptedSource::new(u64::MAX)),
            Duration::from_millis(10),
        );
        let mut handle = poller.spawn();

        assert!(handle.changed().await);
        let first = handle.latest();
        assert_eq!(first.seq, 1);
        assert_eq!(first.coordinate, Coordinate::new(10.0, 1.0));

        assert!(handle.changed().await);
        let second = handle.latest();
        assert_eq!(second.seq, 2);
        assert_eq!(second.coordinate, Coordinate::new(20.0, 2.0));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_polls_retain_the_previous_value() {
        let source = Arc::new(ScriptedSource::new(1));
        let poller = CoordinatePoller::new(source, Duration::from_millis(10));
        let metrics = poller.metrics();
        let mut handle = poller.spawn();

        assert!(handle.changed().await);
        let published = handle.latest();
        assert_eq!(published.coordinate, Coordinate::new(10.0, 1.0));

        // Let several failing ticks elapse; the published feed must not move.
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.latest(), published);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.polls_ok, 1);
        assert!(snapshot.polls_failed >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn no_success_keeps_the_default_coordinate() {
        let poller = CoordinatePoller::new(
            Arc::new(ScriptedSource::new(0)),
            Duration::from_millis(10),
        );
        let handle = poller.spawn();

        time::sleep(Duration::from_millis(100)).await;
        let feed = handle.latest();
        assert_eq!(feed.seq, 0);
        assert_eq!(feed.coordinate, Coordinate::new(0.0, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_further_updates() {
        let poller = CoordinatePoller::new(
            Arc::new(ScriptedSource::new(u64::MAX)),
            Duration::from_millis(10),
        );
        let mut handle = poller.spawn();

        assert!(handle.changed().await);
        handle.shutdown();
        let before = handle.latest();

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.latest(), before);
        assert!(!handle.updates.has_changed().unwrap_or(false));
    }
}
