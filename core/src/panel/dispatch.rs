use std::sync::Arc;

use crate::prelude::{BackendError, BackendResult};
use crate::table::{endpoint_url, CommandKind, CommandRequest};
use crate::telemetry::{FeedMetrics, TraceLog};

/// One-shot sender for the panel's command endpoints.
///
/// Each accepted button press becomes a single `POST {base_url}{route}` with
/// a [`CommandRequest`] body. Response bodies are ignored; only the HTTP
/// status is consumed.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    http: reqwest::Client,
    base_url: String,
    hardware_type: String,
    metrics: Arc<FeedMetrics>,
    trace: TraceLog,
}

impl CommandDispatcher {
    pub fn new(base_url: impl Into<String>, hardware_type: impl Into<String>) -> Self {
        Self::with_metrics(base_url, hardware_type, Arc::new(FeedMetrics::new()))
    }

    pub fn with_metrics(
        base_url: impl Into<String>,
        hardware_type: impl Into<String>,
        metrics: Arc<FeedMetrics>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            hardware_type: hardware_type.into(),
            metrics,
            trace: TraceLog,
        }
    }

    pub fn metrics(&self) -> Arc<FeedMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Posts the command and reports the outcome. Failures carry no retry;
    /// the caller surfaces them through the panel status line.
    pub async fn dispatch(&self, kind: CommandKind) -> BackendResult<()> {
        match self.post_command(kind).await {
            Ok(()) => {
                self.metrics.record_command_ok();
                self.trace.command_sent(kind);
                Ok(())
            }
            Err(err) => {
                self.metrics.record_command_failed();
                self.trace.command_failed(kind, &err);
                Err(err)
            }
        }
    }

    async fn post_command(&self, kind: CommandKind) -> BackendResult<()> {
        let response = self
            .http
            .post(self.command_url(kind))
            .json(&self.request_body(kind))
            .send()
            .await
            .map_err(|err| BackendError::Network(err.to_string()))?;
        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    fn command_url(&self, kind: CommandKind) -> String {
        endpoint_url(&self.base_url, kind.route())
    }

    fn request_body(&self, kind: CommandKind) -> CommandRequest {
        CommandRequest::new(kind, self.hardware_type.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DEFAULT_HARDWARE_TYPE;

    #[test]
    fn command_urls_follow_the_configured_base() {
        let dispatcher = CommandDispatcher::new("http://127.0.0.1:5000/", DEFAULT_HARDWARE_TYPE);
        assert_eq!(
            dispatcher.command_url(CommandKind::PowerOn),
            "http://127.0.0.1:5000/api/power_on"
        );
        assert_eq!(
            dispatcher.command_url(CommandKind::Stop),
            "http://127.0.0.1:5000/api/stop"
        );
    }

    #[test]
    fn request_body_names_the_pressed_action() {
        let dispatcher = CommandDispatcher::new("http://127.0.0.1:5000", "test_rig");
        let body = dispatcher.request_body(CommandKind::Reset);
        assert_eq!(body.hardware_type, "test_rig");
        assert_eq!(body.action, "reset");
    }
}
