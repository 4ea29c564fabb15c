//! Public types for the session coordinator
//!
//! This module contains all the shared types used across the crate.

mod error;
mod event;
mod session;

pub use error::{CoordinatorError, Result};
pub use event::{AgentEvent, ControlRequest, ControlRequestBody, MessagePayload, CAN_USE_TOOL};
pub use session::{
    PendingApproval, PermissionMode, SessionCost, SessionInfo, SessionStatus, UsageTotals,
};
