//! File-backed marker store.
//!
//! One file per key under the project cache directory
//! (`.chainlink/.cache/`). The file's mtime is the authoritative
//! timestamp; the written content is informational only. Concurrent
//! invocations race on these files without locking by design - a lost
//! update costs at most one redundant re-run.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::markers::MarkerStore;

/// Marker store over one file per key.
///
/// Constructed with `None` for untracked projects, in which case every
/// operation is a no-op and nothing is ever debounced.
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    cache_dir: Option<PathBuf>,
}

impl FileMarkerStore {
    /// Create a store rooted at the given cache directory.
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self { cache_dir }
    }

    /// Path of the marker file for a key.
    fn marker_path(&self, key: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|d| d.join(key))
    }
}

impl MarkerStore for FileMarkerStore {
    fn touch(&self, key: &str) {
        let Some(path) = self.marker_path(key) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!("marker dir {}: {} (skipping touch)", parent.display(), e);
                return;
            }
        }
        let stamp = chrono::Utc::now().timestamp().to_string();
        if let Err(e) = fs::write(&path, stamp) {
            tracing::warn!("marker {}: {} (skipping touch)", path.display(), e);
        }
    }

    fn timestamp(&self, key: &str) -> Option<SystemTime> {
        let path = self.marker_path(key)?;
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::tests::test_marker_store_basics;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_basics() {
        let dir = TempDir::new().unwrap();
        let store = FileMarkerStore::new(Some(dir.path().to_path_buf()));
        test_marker_store_basics(&store);
    }

    #[test]
    fn test_touch_creates_cache_dir() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join(".chainlink").join(".cache");
        let store = FileMarkerStore::new(Some(cache.clone()));

        store.touch("last-edit-time");

        assert!(cache.join("last-edit-time").is_file());
    }

    #[test]
    fn test_untracked_store_is_inert() {
        let store = FileMarkerStore::new(None);

        store.touch("k");
        assert!(store.timestamp("k").is_none());
        assert!(store.age_seconds("k").is_none());
    }

    #[test]
    fn test_touch_failure_is_swallowed() {
        // A cache path that cannot be a directory: parent is a regular file.
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = FileMarkerStore::new(Some(blocker.join("cache")));

        // Must not panic; marker stays absent, meaning "not debounced".
        store.touch("k");
        assert!(store.timestamp("k").is_none());
    }
}
