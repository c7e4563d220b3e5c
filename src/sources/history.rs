use std::path::{Path, PathBuf};

use super::drives::VolumeProbe;
use crate::paths;

/// Most-recently-used folders, newest first.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<PathBuf>,
    max: usize,
}

impl History {
    pub fn new(max: usize) -> Self {
        Self { entries: Vec::new(), max }
    }

    pub fn with_entries(entries: Vec<PathBuf>, max: usize) -> Self {
        let mut history = Self::new(max);
        for entry in entries {
            if !history.entries.iter().any(|e| paths::same_path(e, &entry)) {
                history.entries.push(entry);
            }
        }
        history.entries.truncate(max);
        history
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `path` at the front. Paths on removable media are never recorded.
    pub fn add(&mut self, path: impl AsRef<Path>, probe: &dyn VolumeProbe) -> bool {
        let path = path.as_ref();
        if probe.is_removable(path) {
            tracing::debug!("Not recording {} in history: removable media", path.display());
            return false;
        }
        self.entries.retain(|e| !paths::same_path(e, path));
        self.entries.insert(0, path.to_path_buf());
        self.entries.truncate(self.max);
        true
    }

    /// Drop entries that no longer exist. Returns how many were removed.
    pub fn clean_up(&mut self) -> usize {
        self.clean_up_with(|path| path.exists())
    }

    pub(crate) fn clean_up_with(&mut self, exists: impl Fn(&Path) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| exists(e));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!("Purged {} stale history entries", removed);
        }
        removed
    }

    pub fn remove(&mut self, index: usize) -> Option<PathBuf> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
