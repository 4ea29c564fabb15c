//! Event ingestion
//!
//! One unbounded channel per event category (status, message, usage)
//! feeds a single-consumer loop. Within a category, per-session ordering
//! holds because one task drains the channels and runs every handler to
//! completion before taking the next event. The categories touch
//! disjoint state (status field, history, usage totals), so interleaving
//! across categories is unspecified and harmless.
//!
//! Exactly-once registration is a property of the channel setup: the
//! coordinator hands out clones of one `EventSender`, never a second
//! loop.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::types::{AgentEvent, MessagePayload, SessionStatus, UsageTotals};

use super::CoordinatorState;

/// Handle for pushing transport events into the coordinator
///
/// Cheap to clone; all clones feed the same ingest loop.
#[derive(Debug, Clone)]
pub struct EventSender {
    status_tx: mpsc::UnboundedSender<AgentEvent>,
    message_tx: mpsc::UnboundedSender<AgentEvent>,
    usage_tx: mpsc::UnboundedSender<AgentEvent>,
    flush_tx: mpsc::UnboundedSender<oneshot::Sender<()>>,
}

impl EventSender {
    /// Route an event to its category channel
    ///
    /// Sends never block; events pushed after coordinator shutdown are
    /// dropped.
    pub fn send(&self, event: AgentEvent) {
        let tx = match &event {
            AgentEvent::Status { .. } => &self.status_tx,
            AgentEvent::Message { .. } => &self.message_tx,
            AgentEvent::Usage { .. } => &self.usage_tx,
        };
        drop(tx.send(event));
    }

    /// Push a status event
    pub fn send_status(&self, session_id: impl Into<String>, status: impl Into<String>) {
        self.send(AgentEvent::Status {
            session_id: session_id.into(),
            status: status.into(),
        });
    }

    /// Push a message event
    pub fn send_message(&self, session_id: impl Into<String>, payload: MessagePayload) {
        self.send(AgentEvent::Message {
            session_id: session_id.into(),
            payload,
        });
    }

    /// Push a usage snapshot event
    pub fn send_usage(&self, session_id: impl Into<String>, usage: UsageTotals) {
        self.send(AgentEvent::Usage {
            session_id: session_id.into(),
            usage,
        });
    }

    /// Wait until every event sent before this call has been applied
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.flush_tx.send(tx).is_ok() {
            drop(rx.await);
        }
    }
}

/// Spawn the single-consumer ingest loop and return its sender handle
pub(crate) fn spawn_ingest_loop(state: Arc<CoordinatorState>) -> EventSender {
    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    let (message_tx, mut message_rx) = mpsc::unbounded_channel();
    let (usage_tx, mut usage_rx) = mpsc::unbounded_channel();
    let (flush_tx, mut flush_rx) = mpsc::unbounded_channel::<oneshot::Sender<()>>();

    tokio::spawn(async move {
        loop {
            // Biased so queued events drain before a flush ack fires
            tokio::select! {
                biased;
                Some(event) = status_rx.recv() => handle_event(&state, event),
                Some(event) = message_rx.recv() => handle_event(&state, event),
                Some(event) = usage_rx.recv() => handle_event(&state, event),
                Some(ack) = flush_rx.recv() => drop(ack.send(())),
                else => break,
            }
        }
        tracing::debug!("ingest loop stopped");
    });

    EventSender {
        status_tx,
        message_tx,
        usage_tx,
        flush_tx,
    }
}

/// Apply one event to the read model; runs to completion synchronously
fn handle_event(state: &CoordinatorState, event: AgentEvent) {
    match event {
        AgentEvent::Status { session_id, status } => {
            state
                .registry
                .update_status(&session_id, SessionStatus::parse(&status));
        }
        AgentEvent::Message { session_id, payload } => {
            if !state.registry.contains(&session_id) {
                tracing::debug!(session_id = %session_id, "message event for unknown session dropped");
                return;
            }
            if let Some(body) = payload.as_approval_request() {
                state.approvals.push_request(&session_id, body);
            }
            state.registry.push_message(&session_id, payload);
        }
        AgentEvent::Usage { session_id, usage } => {
            if !state.registry.contains(&session_id) {
                tracing::debug!(session_id = %session_id, "usage event for unknown session dropped");
                return;
            }
            state.usage.set(&session_id, usage);
        }
    }
}
