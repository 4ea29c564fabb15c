//! Session registry
//!
//! Authoritative mapping of session id to session state. Uses DashMap for
//! concurrent access; all setters tolerate absent ids because events and
//! commands race with removal, so a stale id is never an error.

use std::sync::RwLock;

use dashmap::DashMap;

use crate::types::{MessagePayload, PermissionMode, SessionInfo, SessionStatus};

/// State held for one session
#[derive(Debug)]
pub struct SessionEntry {
    pub id: String,
    pub status: SessionStatus,
    pub working_dir: String,
    pub model: Option<String>,
    pub permission_mode: PermissionMode,
    /// Ordered, append-only message history
    pub message_history: Vec<MessagePayload>,
}

/// Registry of live sessions plus the active-session pointer
///
/// "Active" is the session currently foregrounded for display. It is a
/// pure UI-routing pointer with no lifecycle meaning.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    active: RwLock<Option<String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session with status `Starting` and make it active
    ///
    /// Callers must supply fresh ids; the transport assigns them at spawn
    /// time.
    pub fn add_session(
        &self,
        id: String,
        working_dir: String,
        model: Option<String>,
        permission_mode: Option<PermissionMode>,
    ) {
        let entry = SessionEntry {
            id: id.clone(),
            status: SessionStatus::Starting,
            working_dir,
            model,
            permission_mode: permission_mode.unwrap_or_default(),
            message_history: Vec::new(),
        };
        self.sessions.insert(id.clone(), entry);
        *self.active.write().expect("active lock") = Some(id);
    }

    /// Remove a session; clears the active pointer if it points here.
    /// Idempotent.
    pub fn remove_session(&self, id: &str) {
        self.sessions.remove(id);
        let mut active = self.active.write().expect("active lock");
        if active.as_deref() == Some(id) {
            *active = None;
        }
    }

    /// Replace a session's status. Silently ignored if the id is absent:
    /// status events for removed sessions must not resurrect state.
    pub fn update_status(&self, id: &str, status: SessionStatus) {
        if let Some(mut entry) = self.sessions.get_mut(id) {
            entry.status = status;
        } else {
            tracing::debug!(session_id = %id, "status event for unknown session dropped");
        }
    }

    /// Update a session's cached permission mode (absence-tolerant)
    pub fn set_permission_mode(&self, id: &str, mode: PermissionMode) {
        if let Some(mut entry) = self.sessions.get_mut(id) {
            entry.permission_mode = mode;
        }
    }

    /// Append a message to the session's history; returns false if the
    /// session is gone
    pub fn push_message(&self, id: &str, payload: MessagePayload) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.message_history.push(payload);
                true
            }
            None => false,
        }
    }

    /// Check if a session exists
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Read-model snapshot of one session
    pub fn info(&self, id: &str) -> Option<SessionInfo> {
        self.sessions.get(id).map(|entry| SessionInfo {
            id: entry.id.clone(),
            status: entry.status.clone(),
            working_dir: entry.working_dir.clone(),
            model: entry.model.clone(),
            permission_mode: entry.permission_mode,
        })
    }

    /// Snapshot of all sessions
    pub fn list(&self) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .map(|entry| SessionInfo {
                id: entry.id.clone(),
                status: entry.status.clone(),
                working_dir: entry.working_dir.clone(),
                model: entry.model.clone(),
                permission_mode: entry.permission_mode,
            })
            .collect()
    }

    /// Cloned message history for a session
    pub fn history(&self, id: &str) -> Option<Vec<MessagePayload>> {
        self.sessions.get(id).map(|entry| entry.message_history.clone())
    }

    /// The currently foregrounded session, if any
    pub fn active_session(&self) -> Option<String> {
        self.active.read().expect("active lock").clone()
    }

    /// Point the active-session marker at an existing session.
    /// No-op for unknown ids (the pointer is pure UI routing).
    pub fn set_active(&self, id: &str) {
        if self.sessions.contains_key(id) {
            *self.active.write().expect("active lock") = Some(id.to_string());
        }
    }
}
