//! Session & tool-approval coordinator
//!
//! This module owns the read model for every live agent session and is
//! the only place local state is mutated. Mutations arrive on two paths:
//! transport events through the ingest loop, and operator commands
//! through the [`Coordinator`] facade. Commands are two-phase: issue the
//! request, await the transport's result, and apply the local mutation
//! only on success. A failed command never leaves partial state behind.

mod approvals;
mod ingest;
mod registry;
mod usage;

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::OnceCell;
use serde_json::json;

use crate::pricing::PriceTable;
use crate::transport::{AgentTransport, SpawnRequest};
use crate::types::{
    CoordinatorError, MessagePayload, PendingApproval, PermissionMode, Result, SessionCost,
    SessionInfo,
};

pub use approvals::ApprovalGateway;
pub use ingest::EventSender;
pub use registry::{SessionEntry, SessionRegistry};
pub use usage::UsageLedger;

/// Shared read-model state behind the facade and the ingest loop
#[derive(Debug)]
pub(crate) struct CoordinatorState {
    pub(crate) registry: SessionRegistry,
    pub(crate) approvals: ApprovalGateway,
    pub(crate) usage: UsageLedger,
    pub(crate) prices: PriceTable,
}

impl CoordinatorState {
    pub(crate) fn new(prices: PriceTable) -> Self {
        Self {
            registry: SessionRegistry::new(),
            approvals: ApprovalGateway::new(),
            usage: UsageLedger::new(),
            prices,
        }
    }
}

/// The session & tool-approval coordinator
///
/// Constructed once at process start. External callers mutate state only
/// through the command methods here; transport events flow in through the
/// handle returned by [`Coordinator::event_sender`]. Read methods return
/// snapshots; consumers never hold references into live state.
pub struct Coordinator<T: AgentTransport> {
    transport: Arc<T>,
    state: Arc<CoordinatorState>,
    events: OnceCell<EventSender>,
}

impl<T: AgentTransport> std::fmt::Debug for Coordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("sessions", &self.state.registry.session_count())
            .field("pending_approvals", &self.state.approvals.pending_count())
            .finish()
    }
}

impl<T: AgentTransport> Coordinator<T> {
    /// Create a coordinator with the default price table
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_prices(transport, PriceTable::default())
    }

    /// Create a coordinator with a custom price table
    pub fn with_prices(transport: Arc<T>, prices: PriceTable) -> Self {
        Self {
            transport,
            state: Arc::new(CoordinatorState::new(prices)),
            events: OnceCell::new(),
        }
    }

    /// The event subscription point
    ///
    /// The first call spawns the single-consumer ingest loop; every later
    /// call returns a clone of the same handle, so each event is
    /// delivered exactly once no matter how often this is called.
    pub fn event_sender(&self) -> EventSender {
        self.events
            .get_or_init(|| ingest::spawn_ingest_loop(self.state.clone()))
            .clone()
    }

    // === Commands ===

    /// Spawn a new agent session
    ///
    /// The transport assigns the id. On success the session is registered
    /// with status `Starting` and becomes the active session.
    pub async fn spawn_session(&self, request: SpawnRequest) -> Result<String> {
        let session_id = self.transport.spawn(request.clone()).await?;

        self.state.registry.add_session(
            session_id.clone(),
            request.working_dir,
            request.model,
            request.permission_mode,
        );

        tracing::info!(session_id = %session_id, "session spawned");
        Ok(session_id)
    }

    /// Kill a session and drop all state derived from it
    pub async fn kill_session(&self, session_id: &str) -> Result<()> {
        self.transport.kill(session_id).await?;

        self.state.registry.remove_session(session_id);
        self.state.approvals.clear(session_id);
        self.state.usage.remove(session_id);

        tracing::info!(session_id = %session_id, "session removed");
        Ok(())
    }

    /// Forward a user message to a session
    ///
    /// On success the message is stored in the session's history so it
    /// persists even if the agent never echoes it back.
    pub async fn send_message(&self, session_id: &str, content: &str) -> Result<()> {
        if !self.state.registry.contains(session_id) {
            return Err(CoordinatorError::session_not_found(session_id));
        }

        self.transport.send_message(session_id, content).await?;

        let ts = Utc::now().timestamp_millis();
        let payload = MessagePayload::from_value(json!({
            "type": "user_message",
            "content": content,
            "timestamp": ts,
            "id": format!("user-{ts}"),
        }));
        self.state.registry.push_message(session_id, payload);
        Ok(())
    }

    /// Resolve a pending tool approval
    ///
    /// `updated_input`, when supplied, must be a JSON object; anything
    /// else is rejected before the command is issued and the approval
    /// stays pending. On transport success the matching entry leaves the
    /// queue; resolving an id that already left the queue is a no-op.
    pub async fn approve_tool(
        &self,
        session_id: &str,
        request_id: &str,
        approved: bool,
        updated_input: Option<serde_json::Value>,
    ) -> Result<()> {
        if let Some(input) = &updated_input {
            if !input.is_object() {
                return Err(CoordinatorError::invalid_approval_input(
                    "updated tool input must be a JSON object",
                ));
            }
        }

        self.transport
            .approve_tool(session_id, request_id, approved, updated_input)
            .await?;

        if self.state.approvals.remove(session_id, request_id).is_none() {
            tracing::debug!(
                session_id = %session_id,
                request_id = %request_id,
                "resolved approval was no longer queued"
            );
        }
        Ok(())
    }

    /// Resolve a pending approval whose input was edited by hand
    ///
    /// Parses `raw_input` as JSON first; a parse failure surfaces
    /// synchronously and nothing is dispatched.
    pub async fn approve_tool_with_edited_input(
        &self,
        session_id: &str,
        request_id: &str,
        approved: bool,
        raw_input: &str,
    ) -> Result<()> {
        let input: serde_json::Value = serde_json::from_str(raw_input)?;
        self.approve_tool(session_id, request_id, approved, Some(input))
            .await
    }

    /// Resolve the actionable (head-of-queue) approval for a session
    pub async fn resolve_actionable(&self, session_id: &str, approved: bool) -> Result<()> {
        let approval = self
            .state
            .approvals
            .actionable(session_id)
            .ok_or_else(|| CoordinatorError::approval_not_found(session_id))?;
        self.approve_tool(session_id, &approval.request_id, approved, None)
            .await
    }

    /// Best-effort interrupt of a session's current turn
    ///
    /// No local state changes: pending approvals and in-flight messages
    /// are cleared only by their own terminal events.
    pub async fn interrupt_session(&self, session_id: &str) -> Result<()> {
        self.transport.interrupt(session_id).await
    }

    /// Change a session's permission mode
    ///
    /// The cached mode is updated only after the transport accepts the
    /// change, so the read model never shows a mode the backend rejected.
    pub async fn set_permission_mode(
        &self,
        session_id: &str,
        mode: PermissionMode,
    ) -> Result<()> {
        if !self.state.registry.contains(session_id) {
            return Err(CoordinatorError::session_not_found(session_id));
        }

        self.transport.set_permission_mode(session_id, mode).await?;
        self.state.registry.set_permission_mode(session_id, mode);
        Ok(())
    }

    // === Read model ===

    /// Stored message history for a session
    pub fn message_history(&self, session_id: &str) -> Result<Vec<MessagePayload>> {
        self.state
            .registry
            .history(session_id)
            .ok_or_else(|| CoordinatorError::session_not_found(session_id))
    }

    /// Cost/usage snapshot for a session, computed on demand
    pub fn session_cost(&self, session_id: &str) -> Result<SessionCost> {
        let info = self
            .state
            .registry
            .info(session_id)
            .ok_or_else(|| CoordinatorError::session_not_found(session_id))?;

        Ok(self.state.usage.estimate_cost(
            session_id,
            info.model.as_deref(),
            &self.state.prices,
        ))
    }

    /// Snapshot of all live sessions
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        self.state.registry.list()
    }

    /// Snapshot of one session
    pub fn session(&self, session_id: &str) -> Option<SessionInfo> {
        self.state.registry.info(session_id)
    }

    /// Ordered unresolved approvals for a session; the head is actionable
    pub fn pending_approvals(&self, session_id: &str) -> Vec<PendingApproval> {
        self.state.approvals.list_pending(session_id)
    }

    /// The single approval a human can act on right now, if any
    pub fn actionable_approval(&self, session_id: &str) -> Option<PendingApproval> {
        self.state.approvals.actionable(session_id)
    }

    /// The session currently foregrounded for display
    pub fn active_session(&self) -> Option<String> {
        self.state.registry.active_session()
    }

    /// Foreground a session. No-op for unknown ids.
    pub fn focus_session(&self, session_id: &str) {
        self.state.registry.set_active(session_id);
    }
}
