//! chainguard - workflow policy hooks for Claude Code
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use chainguard::config::{find_chainlink_dir, ProjectContext};
use chainguard::error::exit_codes;
use chainguard::hooks::{HookRunner, HookType};
use chainguard::markers::FileMarkerStore;
use chainguard::tracker::ChainlinkBin;

// =============================================================================
// CLI Definition
// =============================================================================

/// chainguard - workflow policy hooks for Claude Code
#[derive(Parser)]
#[command(name = "chainguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// [Internal] Run a hook (JSON stdin/stdout). Called by Claude Code hooks
    Hook {
        /// The hook event type
        #[arg(value_enum)]
        event: HookEvent,
    },

    /// [User] Scaffold .chainlink/ hook configuration
    Init {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Force overwrite existing files
        #[arg(long, short)]
        force: bool,
    },

    /// [User] Scan a file for stub patterns
    Scan {
        /// File to scan
        file: PathBuf,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum HookEvent {
    SessionStart,
    UserPromptSubmit,
    PreToolUse,
    PostToolUse,
}

impl From<HookEvent> for HookType {
    fn from(event: HookEvent) -> Self {
        match event {
            HookEvent::SessionStart => HookType::SessionStart,
            HookEvent::UserPromptSubmit => HookType::UserPromptSubmit,
            HookEvent::PreToolUse => HookType::PreToolUse,
            HookEvent::PostToolUse => HookType::PostToolUse,
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    run()
}

/// Set up the global panic handler.
///
/// On panic, logs to stderr and `.chainlink/.cache/crash.log`, then exits
/// with the crash code. Crashes must never block the agent (fail-open).
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("chainguard panic: {}", info);

        let crash_log = std::env::current_dir()
            .ok()
            .and_then(|cwd| find_chainlink_dir(&cwd))
            .map(|dir| dir.join(".cache").join("crash.log"));
        if let Some(crash_log) = crash_log {
            if let Some(parent) = crash_log.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hook { event } => run_hook(event.into()),
        Commands::Init { json, quiet, force } => run_init(json, quiet, force),
        Commands::Scan { file, json, quiet } => run_scan(&file, json, quiet),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn run_hook(hook: HookType) -> ExitCode {
    let project = ProjectContext::from_env();
    let markers = FileMarkerStore::new(project.cache_dir());
    let runner = HookRunner::new(project, markers, ChainlinkBin);

    let outcome = runner.run(hook);

    if let Some(text) = &outcome.text {
        println!("{}", text);
    }

    ExitCode::from(outcome.exit_code as u8)
}

fn run_init(json: bool, quiet: bool, force: bool) -> ExitCode {
    use chainguard::cli::{InitCommand, InitOptions};

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("chainguard error: cannot determine working directory: {}", e);
            return ExitCode::from(exit_codes::ERROR as u8);
        }
    };

    let cmd = InitCommand::new(cwd);
    let options = InitOptions { json, quiet, force };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    if output.success {
        ExitCode::from(exit_codes::APPROVE as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn run_scan(file: &std::path::Path, json: bool, quiet: bool) -> ExitCode {
    use chainguard::cli::{ScanCommand, ScanOptions};

    let cmd = ScanCommand::new();
    let options = ScanOptions { json, quiet };

    let output = cmd.run(file, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    // Findings are advisory; the scan command itself always succeeds.
    ExitCode::from(exit_codes::APPROVE as u8)
}

// =============================================================================
// Tests
// =============================================================================
