//! Event types pushed by the external transport
//!
//! Each session produces an ordered stream of `AgentEvent`s: lifecycle
//! status changes, agent messages, and usage snapshots. Message payloads
//! are polymorphic on the wire; `MessagePayload` models the known kinds as
//! tagged variants and preserves everything else verbatim in `Opaque` so
//! unrecognized payloads still reach the message history.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::session::UsageTotals;

/// One event from the external transport, discriminated by a `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Lifecycle status change for a session
    Status { session_id: String, status: String },
    /// An agent message, possibly embedding an approval request
    Message {
        session_id: String,
        payload: MessagePayload,
    },
    /// Cumulative usage snapshot for a session
    Usage {
        session_id: String,
        usage: UsageTotals,
    },
}

impl AgentEvent {
    /// The session this event belongs to
    pub fn session_id(&self) -> &str {
        match self {
            Self::Status { session_id, .. }
            | Self::Message { session_id, .. }
            | Self::Usage { session_id, .. } => session_id,
        }
    }
}

/// A message payload from the agent, dispatched by its `type` field
///
/// Known kinds get their own variant; anything else lands in `Opaque` with
/// the raw payload intact for display and forward-compatible forwarding.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    /// Assistant turn content
    Assistant(Value),
    /// End-of-turn result
    Result(Value),
    /// Incremental streaming delta
    StreamEvent(Value),
    /// Control-plane request from the agent (approval requests live here)
    ControlRequest(ControlRequest),
    /// Unrecognized payload, kept verbatim
    Opaque(Value),
}

/// A `control_request` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRequest {
    pub request: ControlRequestBody,
    #[serde(flatten)]
    pub extra: Value,
}

/// Body of a control request
///
/// `subtype == "can_use_tool"` with a non-empty `request_id` marks a
/// tool-use permission request awaiting a human decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRequestBody {
    pub subtype: String,
    pub request_id: Option<String>,
    pub tool_name: Option<String>,
    pub tool_use_id: Option<String>,
    pub input: Option<Value>,
    #[serde(flatten)]
    pub extra: Value,
}

/// Request subtype that marks a tool-use permission request
pub const CAN_USE_TOOL: &str = "can_use_tool";

impl MessagePayload {
    /// Classify a raw payload by its `type` field. Never fails.
    pub fn from_value(value: Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some("assistant") => Self::Assistant(value),
            Some("result") => Self::Result(value),
            Some("stream_event") => Self::StreamEvent(value),
            Some("control_request") => match serde_json::from_value(value.clone()) {
                Ok(ctrl) => Self::ControlRequest(ctrl),
                // A control_request we cannot parse is still worth keeping
                Err(_) => Self::Opaque(value),
            },
            _ => Self::Opaque(value),
        }
    }

    /// The raw wire form of this payload
    pub fn to_value(&self) -> Value {
        match self {
            Self::Assistant(v) | Self::Result(v) | Self::StreamEvent(v) | Self::Opaque(v) => {
                v.clone()
            }
            Self::ControlRequest(ctrl) => {
                let mut v = serde_json::to_value(ctrl).unwrap_or(Value::Null);
                if let Some(map) = v.as_object_mut() {
                    map.insert("type".to_string(), Value::String("control_request".into()));
                }
                v
            }
        }
    }

    /// Return the control-request body if this payload is a tool-use
    /// permission request with a usable request id
    pub fn as_approval_request(&self) -> Option<&ControlRequestBody> {
        match self {
            Self::ControlRequest(ctrl)
                if ctrl.request.subtype == CAN_USE_TOOL
                    && ctrl
                        .request
                        .request_id
                        .as_deref()
                        .is_some_and(|id| !id.is_empty()) =>
            {
                Some(&ctrl.request)
            }
            _ => None,
        }
    }
}

impl Serialize for MessagePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MessagePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_payload_classifies_known_kinds() {
        let assistant = MessagePayload::from_value(json!({"type": "assistant", "message": {}}));
        assert!(matches!(assistant, MessagePayload::Assistant(_)));

        let result = MessagePayload::from_value(json!({"type": "result", "result": "done"}));
        assert!(matches!(result, MessagePayload::Result(_)));

        let stream = MessagePayload::from_value(json!({"type": "stream_event", "event": {}}));
        assert!(matches!(stream, MessagePayload::StreamEvent(_)));
    }

    #[test]
    fn test_payload_unknown_kind_preserved() {
        let raw = json!({"type": "tool_progress", "progress": 0.5});
        let payload = MessagePayload::from_value(raw.clone());
        assert!(matches!(payload, MessagePayload::Opaque(_)));
        assert_eq!(payload.to_value(), raw);
    }

    #[test]
    fn test_payload_missing_type_is_opaque() {
        let raw = json!({"whatever": true});
        let payload = MessagePayload::from_value(raw.clone());
        assert!(matches!(payload, MessagePayload::Opaque(_)));
        assert_eq!(payload.to_value(), raw);
    }

    #[test]
    fn test_control_request_parsing() {
        let raw = json!({
            "type": "control_request",
            "request": {
                "subtype": "can_use_tool",
                "request_id": "r1",
                "tool_name": "Edit",
                "tool_use_id": "tu1",
                "input": {"file_path": "/a"}
            }
        });
        let payload = MessagePayload::from_value(raw);
        let body = payload.as_approval_request().expect("approval request");
        assert_eq!(body.request_id.as_deref(), Some("r1"));
        assert_eq!(body.tool_name.as_deref(), Some("Edit"));
        assert_eq!(body.tool_use_id.as_deref(), Some("tu1"));
        assert_eq!(body.input, Some(json!({"file_path": "/a"})));
    }

    #[test]
    fn test_control_request_without_request_id_is_not_approval() {
        let raw = json!({
            "type": "control_request",
            "request": {"subtype": "can_use_tool"}
        });
        let payload = MessagePayload::from_value(raw);
        assert!(matches!(payload, MessagePayload::ControlRequest(_)));
        assert!(payload.as_approval_request().is_none());

        // Empty string request id is also unusable
        let raw = json!({
            "type": "control_request",
            "request": {"subtype": "can_use_tool", "request_id": ""}
        });
        let payload = MessagePayload::from_value(raw);
        assert!(payload.as_approval_request().is_none());
    }

    #[test]
    fn test_other_control_subtypes_are_not_approvals() {
        let raw = json!({
            "type": "control_request",
            "request": {"subtype": "interrupt", "request_id": "r9"}
        });
        let payload = MessagePayload::from_value(raw);
        assert!(payload.as_approval_request().is_none());
    }

    #[test]
    fn test_control_request_round_trip_keeps_tag() {
        let raw = json!({
            "type": "control_request",
            "request": {"subtype": "can_use_tool", "request_id": "r1"}
        });
        let payload = MessagePayload::from_value(raw);
        let back = payload.to_value();
        assert_eq!(back.get("type").and_then(Value::as_str), Some("control_request"));
        assert_eq!(
            back["request"]["request_id"].as_str(),
            Some("r1")
        );
    }

    #[test]
    fn test_agent_event_tagged_serde() {
        let json_in = json!({
            "type": "usage",
            "session_id": "s1",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        });
        let event: AgentEvent = serde_json::from_value(json_in).unwrap();
        assert_eq!(event.session_id(), "s1");
        match &event {
            AgentEvent::Usage { usage, .. } => assert_eq!(usage.input_tokens, 10),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_agent_event_message_payload_nested() {
        let json_in = json!({
            "type": "message",
            "session_id": "s1",
            "payload": {"type": "assistant", "message": {"content": []}}
        });
        let event: AgentEvent = serde_json::from_value(json_in).unwrap();
        match event {
            AgentEvent::Message { payload, .. } => {
                assert!(matches!(payload, MessagePayload::Assistant(_)));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
