//! Session-related types: lifecycle status, permission modes, usage and cost

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session
///
/// Status tags come from the external transport and are informational: the
/// coordinator accepts any string and performs no transition validation.
/// Unknown tags are preserved in `Other` so future transport versions do
/// not break the read model; consumers display them as error-like states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    Starting,
    Connected,
    Active,
    Idle,
    Disconnected,
    /// Session failed; carries the transport's error detail
    Error(String),
    Terminated,
    /// Unrecognized status tag, kept verbatim
    Other(String),
}

impl SessionStatus {
    /// Parse a status tag. Never fails: unknown tags become `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Starting" => Self::Starting,
            "Connected" => Self::Connected,
            "Active" => Self::Active,
            "Idle" => Self::Idle,
            "Disconnected" => Self::Disconnected,
            "Error" => Self::Error(String::new()),
            "Terminated" => Self::Terminated,
            other => match other.strip_prefix("Error: ") {
                Some(detail) => Self::Error(detail.to_string()),
                None => Self::Other(other.to_string()),
            },
        }
    }

    /// The status tag, without any error detail
    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "Starting",
            Self::Connected => "Connected",
            Self::Active => "Active",
            Self::Idle => "Idle",
            Self::Disconnected => "Disconnected",
            Self::Error(_) => "Error",
            Self::Terminated => "Terminated",
            Self::Other(s) => s,
        }
    }

    /// Whether the session has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Error(_) | Self::Terminated)
    }

    /// Whether consumers should render this status as an error state
    pub fn is_error_like(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Other(_))
    }
}

impl From<String> for SessionStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error(detail) if !detail.is_empty() => write!(f, "Error: {detail}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Permission mode governing which tool calls require human approval
///
/// One per session, mutated only via an explicit command. Never inferred
/// from tool activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionMode {
    /// Default mode - prompt for sensitive operations
    #[default]
    Default,
    /// Planning mode - read-only operations
    Plan,
    /// Auto-approve file edits
    AcceptEdits,
    /// Bypass all permission checks (dangerous)
    BypassPermissions,
}

impl PermissionMode {
    /// Parse from the wire string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "plan" => Some(Self::Plan),
            "acceptEdits" => Some(Self::AcceptEdits),
            "bypassPermissions" => Some(Self::BypassPermissions),
            _ => None,
        }
    }

    /// Convert to the wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Plan => "plan",
            Self::AcceptEdits => "acceptEdits",
            Self::BypassPermissions => "bypassPermissions",
        }
    }
}

impl std::fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative token usage for a session
///
/// The transport is the accumulator of record: each usage event carries the
/// full totals and replaces the previous snapshot, no local aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    /// Number of input tokens
    pub input_tokens: u64,

    /// Number of output tokens
    pub output_tokens: u64,

    /// Number of tokens written to cache
    #[serde(default)]
    pub cache_creation_input_tokens: u64,

    /// Number of tokens read from cache
    #[serde(default)]
    pub cache_read_input_tokens: u64,
}

impl UsageTotals {
    /// Create a new empty usage snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total token count (input + output)
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Check if any tokens were used
    pub fn is_empty(&self) -> bool {
        self.input_tokens == 0 && self.output_tokens == 0
    }
}

/// Read-model snapshot of one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub status: SessionStatus,
    pub working_dir: String,
    pub model: Option<String>,
    pub permission_mode: PermissionMode,
}

/// Cost/usage snapshot for a session, computed on demand
#[derive(Debug, Clone, Serialize)]
pub struct SessionCost {
    pub session_id: String,
    pub model: Option<String>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_input_tokens: u64,
    pub cache_read_input_tokens: u64,
    pub estimated_cost_usd: f64,
}

/// One outstanding human-approval decision
///
/// Created when ingestion detects a tool-use permission request inside the
/// message stream; destroyed on a terminal decision or session removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApproval {
    /// Unique per request, supplied by the agent-side protocol
    pub request_id: String,
    /// Name of the tool awaiting approval, `"unknown"` if the request omitted it
    pub tool_name: String,
    /// Structured tool arguments, `{}` if the request omitted them
    pub tool_input: serde_json::Value,
    /// Correlates to the underlying tool invocation
    pub tool_use_id: Option<String>,
    /// Owning session
    pub session_id: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_parse_known() {
        assert_eq!(SessionStatus::parse("Starting"), SessionStatus::Starting);
        assert_eq!(SessionStatus::parse("Idle"), SessionStatus::Idle);
        assert_eq!(
            SessionStatus::parse("Terminated"),
            SessionStatus::Terminated
        );
    }

    #[test]
    fn test_status_parse_unknown_preserved() {
        let status = SessionStatus::parse("Exploded(code 137)");
        assert_eq!(
            status,
            SessionStatus::Other("Exploded(code 137)".to_string())
        );
        assert_eq!(status.as_str(), "Exploded(code 137)");
        assert!(status.is_error_like());
        assert!(!SessionStatus::Active.is_error_like());
    }

    #[test]
    fn test_status_error_carries_detail() {
        let status = SessionStatus::parse("Error: process exited with code 1");
        assert_eq!(
            status,
            SessionStatus::Error("process exited with code 1".to_string())
        );
        assert_eq!(status.as_str(), "Error");
        assert_eq!(status.to_string(), "Error: process exited with code 1");
        assert!(status.is_error_like());

        assert_eq!(
            SessionStatus::parse("Error"),
            SessionStatus::Error(String::new())
        );
    }

    #[test]
    fn test_status_terminal() {
        assert!(SessionStatus::Disconnected.is_terminal());
        assert!(SessionStatus::Terminated.is_terminal());
        assert!(SessionStatus::Error("gone".into()).is_terminal());
        assert!(!SessionStatus::Active.is_terminal());
        assert!(!SessionStatus::Other("weird".into()).is_terminal());
    }

    #[test]
    fn test_status_serde_round_trip() {
        let json = serde_json::to_string(&SessionStatus::Connected).unwrap();
        assert_eq!(json, "\"Connected\"");

        let status: SessionStatus = serde_json::from_str("\"SomethingNew\"").unwrap();
        assert_eq!(status, SessionStatus::Other("SomethingNew".to_string()));

        let json = serde_json::to_string(&SessionStatus::Error("boom".into())).unwrap();
        let back: SessionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SessionStatus::Error("boom".to_string()));
    }

    #[test]
    fn test_permission_mode_parse() {
        assert_eq!(
            PermissionMode::parse("default"),
            Some(PermissionMode::Default)
        );
        assert_eq!(PermissionMode::parse("plan"), Some(PermissionMode::Plan));
        assert_eq!(
            PermissionMode::parse("acceptEdits"),
            Some(PermissionMode::AcceptEdits)
        );
        assert_eq!(
            PermissionMode::parse("bypassPermissions"),
            Some(PermissionMode::BypassPermissions)
        );
        assert_eq!(PermissionMode::parse("invalid"), None);
    }

    #[test]
    fn test_permission_mode_wire_names() {
        assert_eq!(PermissionMode::AcceptEdits.as_str(), "acceptEdits");
        let json = serde_json::to_string(&PermissionMode::BypassPermissions).unwrap();
        assert_eq!(json, "\"bypassPermissions\"");
    }

    #[test]
    fn test_usage_totals_default() {
        let totals = UsageTotals::default();
        assert!(totals.is_empty());
        assert_eq!(totals.total(), 0);
    }

    #[test]
    fn test_usage_totals_missing_cache_fields() {
        // Older transports omit the cache counters
        let totals: UsageTotals =
            serde_json::from_str(r#"{"input_tokens": 100, "output_tokens": 50}"#).unwrap();
        assert_eq!(totals.input_tokens, 100);
        assert_eq!(totals.cache_creation_input_tokens, 0);
        assert_eq!(totals.cache_read_input_tokens, 0);
        assert_eq!(totals.total(), 150);
    }
}
