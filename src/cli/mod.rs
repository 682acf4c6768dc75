//! CLI commands for chainguard.
//!
//! - **Hook command**: `hook <event>` (Claude Code integration, in `main`)
//! - **User commands**: `init` (scaffold configuration), `scan` (manual
//!   stub scan)

pub mod init;
pub mod scan_cmd;

pub use init::{InitCommand, InitOptions, InitOutput};
pub use scan_cmd::{ScanCommand, ScanOptions, ScanOutput};
