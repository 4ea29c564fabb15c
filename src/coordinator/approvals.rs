//! Approval gateway
//!
//! Holds the per-session FIFO queues of tool-use permission requests
//! detected in the message stream. The head of a session's queue is the
//! single actionable approval; resolution and clearing are driven by the
//! command facade.

use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;

use crate::types::{ControlRequestBody, PendingApproval};

/// Sentinel tool name when a request omits one
const UNKNOWN_TOOL: &str = "unknown";

/// Per-session queues of unresolved approvals
#[derive(Debug, Default)]
pub struct ApprovalGateway {
    pending: DashMap<String, Vec<PendingApproval>>,
}

impl ApprovalGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an approval request detected in a session's message stream
    ///
    /// The caller has already matched the control-request shape; missing
    /// tool name and input fall back to `"unknown"` and `{}`.
    pub fn push_request(&self, session_id: &str, body: &ControlRequestBody) {
        let Some(request_id) = body.request_id.clone().filter(|id| !id.is_empty()) else {
            return;
        };

        let approval = PendingApproval {
            request_id,
            tool_name: body
                .tool_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
            tool_input: body.input.clone().unwrap_or_else(|| json!({})),
            tool_use_id: body.tool_use_id.clone(),
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
        };

        tracing::info!(
            session_id = %session_id,
            request_id = %approval.request_id,
            tool_name = %approval.tool_name,
            "pending approval queued"
        );

        self.pending
            .entry(session_id.to_string())
            .or_default()
            .push(approval);
    }

    /// Ordered snapshot of unresolved approvals for a session
    ///
    /// The first element is the actionable one.
    pub fn list_pending(&self, session_id: &str) -> Vec<PendingApproval> {
        self.pending
            .get(session_id)
            .map(|queue| queue.clone())
            .unwrap_or_default()
    }

    /// The approval a human can act on right now, if any
    pub fn actionable(&self, session_id: &str) -> Option<PendingApproval> {
        self.pending
            .get(session_id)
            .and_then(|queue| queue.first().cloned())
    }

    /// Check whether a request id is still pending for a session
    pub fn contains(&self, session_id: &str, request_id: &str) -> bool {
        self.pending
            .get(session_id)
            .is_some_and(|queue| queue.iter().any(|a| a.request_id == request_id))
    }

    /// Remove one resolved approval; returns it if it was queued.
    /// Called by the facade only after the transport acked the decision.
    pub fn remove(&self, session_id: &str, request_id: &str) -> Option<PendingApproval> {
        let mut queue = self.pending.get_mut(session_id)?;
        let idx = queue.iter().position(|a| a.request_id == request_id)?;
        Some(queue.remove(idx))
    }

    /// Drop all pending approvals for a session (used on session removal)
    pub fn clear(&self, session_id: &str) {
        self.pending.remove(session_id);
    }

    /// Total unresolved approvals across all sessions
    pub fn pending_count(&self) -> usize {
        self.pending.iter().map(|queue| queue.len()).sum()
    }
}
