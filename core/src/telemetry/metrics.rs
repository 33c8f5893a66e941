use std::sync::Mutex;

/// Counters for the polling and command paths.
#[derive(Debug)]
pub struct FeedMetrics {
    inner: Mutex<Counters>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    polls_ok: u64,
    polls_failed: u64,
    ticks_skipped: u64,
    commands_ok: u64,
    commands_failed: u64,
}

/// Point-in-time copy of the feed counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub polls_ok: u64,
    pub polls_failed: u64,
    pub ticks_skipped: u64,
    pub commands_ok: u64,
    pub commands_failed: u64,
}

impl FeedMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_poll_ok(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.polls_ok += 1;
        }
    }

    pub fn record_poll_failed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.polls_failed += 1;
        }
    }

    pub fn record_tick_skipped(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.ticks_skipped += 1;
        }
    }

    pub fn record_command_ok(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.commands_ok += 1;
        }
    }

    pub fn record_command_failed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.commands_failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(counters) = self.inner.lock() {
            MetricsSnapshot {
                polls_ok: counters.polls_ok,
                polls_failed: counters.polls_failed,
                ticks_skipped: counters.ticks_skipped,
                commands_ok: counters.commands_ok,
                commands_failed: counters.commands_failed,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counts() {
        let metrics = FeedMetrics::new();
        metrics.record_poll_ok();
        metrics.record_poll_ok();
        metrics.record_poll_failed();
        metrics.record_tick_skipped();
        metrics.record_command_ok();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.polls_ok, 2);
        assert_eq!(snapshot.polls_failed, 1);
        assert_eq!(snapshot.ticks_skipped, 1);
        assert_eq!(snapshot.commands_ok, 1);
        assert_eq!(snapshot.commands_failed, 0);
    }
}
