//! Debounce marker store.
//!
//! A marker is a timestamp keyed by purpose, used to suppress redundant
//! repeated actions within a time window. Markers back two independent
//! debounce policies (lint throttling and advisory freshness) plus the
//! test-run staleness check. All marker operations are best-effort: an
//! unreadable or unwritable marker means "not debounced", so the action
//! re-runs. A redundant advisory is harmless; a skipped one is not.

pub mod file;
pub mod memory;

use std::sync::Arc;
use std::time::SystemTime;

pub use file::FileMarkerStore;
pub use memory::MemoryMarkerStore;

/// Well-known marker keys.
pub mod keys {
    /// Touched on every qualifying edit; throttles linting.
    pub const LAST_EDIT_TIME: &str = "last-edit-time";
    /// Touched after the full behavioral guard is emitted.
    pub const GUARD_FULL_SENT: &str = "guard-full-sent";
    /// Touched by the test runner integration; drives test reminders.
    pub const LAST_TEST_RUN: &str = "last_test_run";
}

/// Lint is skipped while the last edit is younger than this.
pub const LINT_DEBOUNCE_SECS: f64 = 10.0;

/// The full advisory is re-sent once the marker is older than this.
pub const ADVISORY_TTL_SECS: f64 = 4.0 * 3600.0;

/// Sessions older than this (minutes) are force-ended at session start.
pub const STALE_SESSION_MINUTES: u32 = 240;

/// Timestamp store for debounce markers.
///
/// Injected into components so tests can substitute [`MemoryMarkerStore`]
/// instead of touching real files.
pub trait MarkerStore {
    /// Record the current time under `key`. Failures are swallowed.
    fn touch(&self, key: &str);

    /// The last time `key` was touched, if it exists and is readable.
    fn timestamp(&self, key: &str) -> Option<SystemTime>;

    /// Age of `key` in seconds relative to wall-clock now.
    fn age_seconds(&self, key: &str) -> Option<f64> {
        let ts = self.timestamp(key)?;
        SystemTime::now()
            .duration_since(ts)
            .ok()
            .map(|d| d.as_secs_f64())
    }
}

/// Blanket implementation for Arc-wrapped stores, so a store can be shared
/// between a runner and the test inspecting it.
impl<T: MarkerStore + ?Sized> MarkerStore for Arc<T> {
    fn touch(&self, key: &str) {
        (**self).touch(key)
    }

    fn timestamp(&self, key: &str) -> Option<SystemTime> {
        (**self).timestamp(key)
    }
}
