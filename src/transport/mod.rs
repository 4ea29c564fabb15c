//! Transport boundary to the agent backend
//!
//! The coordinator never talks to agent processes directly. Everything it
//! asks of the outside world goes through [`AgentTransport`]; everything it
//! learns comes back as [`crate::types::AgentEvent`]s pushed into the
//! ingest channels. The real transport (subprocess plus wire protocol)
//! lives in the hosting application; this crate ships a scripted
//! [`SimTransport`] for tests and the demo binary.

mod sim;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{PermissionMode, Result};

pub use sim::{IssuedCommand, SimTransport};

/// Parameters for spawning a new agent session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnRequest {
    /// Directory the agent operates in
    pub working_dir: String,
    /// Optional prompt to kick off the first turn
    pub initial_prompt: Option<String>,
    /// Optional model identifier
    pub model: Option<String>,
    /// Optional starting permission mode
    pub permission_mode: Option<PermissionMode>,
}

impl SpawnRequest {
    /// Spawn request with only a working directory set
    pub fn new(working_dir: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }
}

/// Commands the coordinator issues to the agent backend
///
/// Each call is one round-trip: the coordinator awaits the result and
/// applies its local state mutation only on success. Session ids are
/// assigned by the transport at spawn time.
#[async_trait]
pub trait AgentTransport: Send + Sync + 'static {
    /// Spawn a new agent session, returning its id
    async fn spawn(&self, request: SpawnRequest) -> Result<String>;

    /// Terminate a session's agent process
    async fn kill(&self, session_id: &str) -> Result<()>;

    /// Forward a user message to a session
    async fn send_message(&self, session_id: &str, content: &str) -> Result<()>;

    /// Answer an outstanding tool-use permission request
    async fn approve_tool(
        &self,
        session_id: &str,
        request_id: &str,
        approved: bool,
        updated_input: Option<serde_json::Value>,
    ) -> Result<()>;

    /// Best-effort interrupt of the session's current turn
    async fn interrupt(&self, session_id: &str) -> Result<()>;

    /// Change the session's permission mode
    async fn set_permission_mode(&self, session_id: &str, mode: PermissionMode) -> Result<()>;
}
