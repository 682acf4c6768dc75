//! Utility functions for chainguard.
//!
//! The main export is [`run_with_timeout`], the synchronous time-boxed
//! subprocess runner shared by the session tracker and the linter runner.
//! A hung external tool must never stall a hook invocation.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Captured output of a completed subprocess.
#[derive(Debug)]
pub struct CommandOutput {
    /// Exit status of the process.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// Failure modes of [`run_with_timeout`].
#[derive(Debug)]
pub enum RunError {
    /// The process did not finish before the deadline and was killed.
    Timeout,
    /// The process could not be spawned or waited on (e.g. binary missing).
    Io(std::io::Error),
}

/// Poll interval while waiting for a child process.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Run a command to completion with a wall-clock deadline.
///
/// stdout and stderr are drained on background threads so a chatty child
/// cannot deadlock against a full pipe. On deadline the child is killed and
/// reaped, and `Err(Timeout)` is returned.
pub fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
) -> std::result::Result<CommandOutput, RunError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(RunError::Io)?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_handle = thread::spawn(move || drain(stdout));
    let err_handle = thread::spawn(move || drain(stderr));

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = out_handle.join().unwrap_or_default();
                let stderr = err_handle.join().unwrap_or_default();
                return Ok(CommandOutput {
                    status,
                    stdout,
                    stderr,
                });
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RunError::Timeout);
                }
                thread::sleep(WAIT_POLL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunError::Io(e));
            }
        }
    }
}

/// Read a child pipe to the end, tolerating read errors.
fn drain(pipe: Option<impl Read>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Truncate a string to at most `max` characters.
///
/// Character-based so multi-byte content is never split mid-codepoint.
pub fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
