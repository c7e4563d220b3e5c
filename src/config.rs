use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prefs::Preferences;

/// Name of the preferences file inside the config directory.
pub const PREFS_FILE: &str = "edgelist.toml";

/// File locations and list caps.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_dir: PathBuf,
    pub bookmarks_file: PathBuf,
    pub history_file: PathBuf,
    pub max_bookmarks: usize,
    pub max_history: usize,
    /// Budget for whole-tree size calculation
    pub size_timeout: Duration,
    /// A removable drive whose readiness probe takes longer than this is marked slow
    pub slow_probe: Duration,
    /// How long the removable check may reuse the last mount table
    pub mount_cache: Duration,
}

impl AppConfig {
    pub const DEFAULT_MAX_BOOKMARKS: usize = 100;
    pub const DEFAULT_MAX_HISTORY: usize = 30;
    pub const DEFAULT_MOUNT_CACHE_MS: u64 = 5000;

    /// Config directory: `$EDGELIST_HOME`, else `<config dir>/edgelist`, else `./.edgelist`.
    pub fn default_dir() -> PathBuf {
        if let Some(home) = std::env::var_os("EDGELIST_HOME") {
            return PathBuf::from(home);
        }
        dirs::config_dir()
            .map(|dir| dir.join("edgelist"))
            .unwrap_or_else(|| PathBuf::from(".edgelist"))
    }

    pub fn prefs_path(dir: &Path) -> PathBuf {
        dir.join(PREFS_FILE)
    }

    /// Read caps and timeouts from `[List]`, `[Size]` and `[Drives]`.
    pub fn from_prefs(config_dir: &Path, prefs: &dyn Preferences) -> Self {
        let bookmarks = prefs.get_string("List", "BookmarkFile", "bookmarks.txt");
        let history = prefs.get_string("List", "HistoryFile", "history.txt");
        Self {
            config_dir: config_dir.to_path_buf(),
            bookmarks_file: config_dir.join(bookmarks),
            history_file: config_dir.join(history),
            max_bookmarks: positive(prefs.get_int("List", "MaxBookmarks", Self::DEFAULT_MAX_BOOKMARKS as i64))
                .unwrap_or(Self::DEFAULT_MAX_BOOKMARKS),
            max_history: positive(prefs.get_int("List", "MaxHistory", Self::DEFAULT_MAX_HISTORY as i64))
                .unwrap_or(Self::DEFAULT_MAX_HISTORY),
            size_timeout: Duration::from_millis(positive(prefs.get_int("Size", "SizeTimeoutMs", 3000)).unwrap_or(3000) as u64),
            slow_probe: Duration::from_millis(positive(prefs.get_int("Drives", "SlowProbeMs", 500)).unwrap_or(500) as u64),
            mount_cache: Duration::from_millis(
                u64::try_from(prefs.get_int("Drives", "MountCacheMs", Self::DEFAULT_MOUNT_CACHE_MS as i64))
                    .unwrap_or(Self::DEFAULT_MOUNT_CACHE_MS),
            ),
        }
    }
}

fn positive(value: i64) -> Option<usize> {
    usize::try_from(value).ok().filter(|&v| v > 0)
}
