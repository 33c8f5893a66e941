use serde::{Deserialize, Serialize};

/// Hardware label stamped on every command request.
pub const DEFAULT_HARDWARE_TYPE: &str = "foosball_table";

/// Path served by the table backend for ball telemetry.
pub const COORDINATES_ROUTE: &str = "/api/coordinates";

/// Operator intents exposed by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    PowerOn,
    Start,
    Reset,
    Stop,
}

impl CommandKind {
    /// The `action` string carried in the request body.
    pub fn action(&self) -> &'static str {
        match self {
            CommandKind::PowerOn => "power_on",
            CommandKind::Start => "start",
            CommandKind::Reset => "reset",
            CommandKind::Stop => "stop",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            CommandKind::PowerOn => "/api/power_on",
            CommandKind::Start => "/api/start",
            CommandKind::Reset => "/api/reset",
            CommandKind::Stop => "/api/stop",
        }
    }

    /// Button caption, as printed on the panel.
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::PowerOn => "Power On",
            CommandKind::Start => "Start Game",
            CommandKind::Reset => "Reset Game",
            CommandKind::Stop => "Emerg. Stop",
        }
    }
}

/// POST body for the command endpoints. Responses are free-form JSON; only
/// HTTP success/failure is consumed by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub hardware_type: String,
    pub action: String,
}

impl CommandRequest {
    pub fn new(kind: CommandKind, hardware_type: impl Into<String>) -> Self {
        Self {
            hardware_type: hardware_type.into(),
            action: kind.action().to_string(),
        }
    }

    /// Whether the body names the given command; used by the table bridge to
    /// reject bodies posted to the wrong route.
    pub fn matches(&self, kind: CommandKind) -> bool {
        self.action == kind.action()
    }
}

/// Joins a configured base URL with a route, tolerating trailing slashes.
pub fn endpoint_url(base_url: &str, route: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), route)
}
