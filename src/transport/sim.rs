//! Scripted in-process transport
//!
//! `SimTransport` acks every command, records what was issued, and can be
//! told to fail specific commands. The demo binary and the coordinator
//! tests drive the read model with it instead of a real agent process.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::types::{CoordinatorError, PermissionMode, Result};

use super::{AgentTransport, SpawnRequest};

/// A command the coordinator issued to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum IssuedCommand {
    Spawn {
        request: SpawnRequest,
        session_id: String,
    },
    Kill {
        session_id: String,
    },
    SendMessage {
        session_id: String,
        content: String,
    },
    ApproveTool {
        session_id: String,
        request_id: String,
        approved: bool,
        updated_input: Option<serde_json::Value>,
    },
    Interrupt {
        session_id: String,
    },
    SetPermissionMode {
        session_id: String,
        mode: PermissionMode,
    },
}

/// In-process transport double with failure injection
#[derive(Debug, Default)]
pub struct SimTransport {
    /// Everything the coordinator asked for, in order
    commands: Mutex<Vec<IssuedCommand>>,
    /// Command names forced to fail ("spawn", "kill", "send_message",
    /// "approve_tool", "interrupt", "set_permission_mode")
    failing: Mutex<HashSet<&'static str>>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the named command to fail until cleared
    pub fn fail_on(&self, command: &'static str) {
        self.failing.lock().expect("failing lock").insert(command);
    }

    /// Let the named command succeed again
    pub fn clear_failure(&self, command: &'static str) {
        self.failing.lock().expect("failing lock").remove(command);
    }

    /// Snapshot of the issued command log
    pub fn commands(&self) -> Vec<IssuedCommand> {
        self.commands.lock().expect("commands lock").clone()
    }

    /// Number of issued commands
    pub fn command_count(&self) -> usize {
        self.commands.lock().expect("commands lock").len()
    }

    fn check(&self, command: &'static str) -> Result<()> {
        if self.failing.lock().expect("failing lock").contains(command) {
            return Err(CoordinatorError::transport(format!(
                "simulated failure: {command}"
            )));
        }
        Ok(())
    }

    fn record(&self, command: IssuedCommand) {
        self.commands.lock().expect("commands lock").push(command);
    }
}

#[async_trait]
impl AgentTransport for SimTransport {
    async fn spawn(&self, request: SpawnRequest) -> Result<String> {
        self.check("spawn")?;
        let session_id = uuid::Uuid::new_v4().to_string();
        self.record(IssuedCommand::Spawn {
            request,
            session_id: session_id.clone(),
        });
        Ok(session_id)
    }

    async fn kill(&self, session_id: &str) -> Result<()> {
        self.check("kill")?;
        self.record(IssuedCommand::Kill {
            session_id: session_id.to_string(),
        });
        Ok(())
    }

    async fn send_message(&self, session_id: &str, content: &str) -> Result<()> {
        self.check("send_message")?;
        self.record(IssuedCommand::SendMessage {
            session_id: session_id.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }

    async fn approve_tool(
        &self,
        session_id: &str,
        request_id: &str,
        approved: bool,
        updated_input: Option<serde_json::Value>,
    ) -> Result<()> {
        self.check("approve_tool")?;
        self.record(IssuedCommand::ApproveTool {
            session_id: session_id.to_string(),
            request_id: request_id.to_string(),
            approved,
            updated_input,
        });
        Ok(())
    }

    async fn interrupt(&self, session_id: &str) -> Result<()> {
        self.check("interrupt")?;
        self.record(IssuedCommand::Interrupt {
            session_id: session_id.to_string(),
        });
        Ok(())
    }

    async fn set_permission_mode(&self, session_id: &str, mode: PermissionMode) -> Result<()> {
        self.check("set_permission_mode")?;
        self.record(IssuedCommand::SetPermissionMode {
            session_id: session_id.to_string(),
            mode,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sim_spawn_assigns_fresh_ids() {
        let transport = SimTransport::new();
        let a = transport.spawn(SpawnRequest::new("/tmp/a")).await.unwrap();
        let b = transport.spawn(SpawnRequest::new("/tmp/b")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(transport.command_count(), 2);
    }

    #[tokio::test]
    async fn test_sim_records_commands_in_order() {
        let transport = SimTransport::new();
        let id = transport.spawn(SpawnRequest::new("/tmp")).await.unwrap();
        transport.send_message(&id, "hello").await.unwrap();
        transport.interrupt(&id).await.unwrap();

        let commands = transport.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[1], IssuedCommand::SendMessage { .. }));
        assert!(matches!(commands[2], IssuedCommand::Interrupt { .. }));
    }

    #[tokio::test]
    async fn test_sim_failure_injection() {
        let transport = SimTransport::new();
        transport.fail_on("kill");

        let err = transport.kill("s1").await.unwrap_err();
        assert!(err.is_retryable());
        // Failed commands are not recorded
        assert_eq!(transport.command_count(), 0);

        transport.clear_failure("kill");
        transport.kill("s1").await.unwrap();
        assert_eq!(transport.command_count(), 1);
    }
}
