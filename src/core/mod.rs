//! Core policy types for chainguard.
//!
//! - [`event`]: tool invocation events as seen by the gate
//! - [`gate`]: the pure allow/deny/warn decision function
//! - [`session`]: the normalized session view and the status text adapter

pub mod event;
pub mod gate;
pub mod session;

pub use event::{ToolInvocationEvent, ToolKind};
pub use gate::{decide, static_decision, Decision, DenyReason, WarnReason};
pub use session::{parse_status, SessionProbe, SessionState};
