//! Agent Cockpit
//!
//! A session & tool-approval coordinator for interactive agent backends.
//! The coordinator owns the read model between a transport that runs
//! agent sessions and the surfaces that display them: session lifecycle,
//! per-session message history, pending tool approvals, token usage and
//! cost estimation, and permission modes.
//!
//! ## Features
//!
//! - Session registry with an active-session pointer for UI routing
//! - Single-consumer event ingestion (status, message, usage streams)
//! - Tool-approval queues with one actionable request per session
//! - On-demand cost estimation from replace-on-write usage totals
//! - Two-phase commands: local state changes only after the transport
//!   accepts the command
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use agent_cockpit::coordinator::Coordinator;
//! use agent_cockpit::transport::{SimTransport, SpawnRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let coordinator = Coordinator::new(Arc::new(SimTransport::new()));
//!     let session_id = coordinator
//!         .spawn_session(SpawnRequest::new("/path/to/project"))
//!         .await?;
//!     coordinator.send_message(&session_id, "hello").await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod coordinator;
pub mod logging;
pub mod pricing;
pub mod transport;
pub mod types;

pub use coordinator::{Coordinator, EventSender};
pub use transport::{AgentTransport, SpawnRequest};
pub use types::{CoordinatorError, Result};
