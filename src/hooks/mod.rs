//! Hook integration for Claude Code.
//!
//! This module provides types and handlers for the hook events chainguard
//! participates in:
//!
//! - **session-start**: tracker session lifecycle, startup context
//! - **user-prompt-submit**: behavioral guard injection
//! - **pre-tool-use**: the policy gate and the web security protocol
//! - **post-tool-use**: stub scan, debounced lint, test reminder

pub mod input;
pub mod output;
pub mod runner;

pub use input::{read_stdin, ToolUseInput};
pub use output::{AdditionalContext, HookOutcome, HookSpecificOutput};
pub use runner::{HookRunner, HookType};
