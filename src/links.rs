use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Detects links and resolves their targets.
pub trait LinkResolver {
    fn is_link(&self, path: &Path) -> bool;
    /// Final target of the link, `None` when it cannot be resolved.
    fn resolve(&self, path: &Path) -> Option<PathBuf>;
}

/// Symlinks are resolved through the filesystem. Shell `.lnk` files are
/// recognised by name and resolved by parsing the shortcut.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLinkResolver;

impl LinkResolver for FsLinkResolver {
    fn is_link(&self, path: &Path) -> bool {
        let is_symlink = fs::symlink_metadata(path).map(|m| m.file_type().is_symlink()).unwrap_or(false);
        is_symlink || paths::has_link_suffix(&path.to_string_lossy())
    }

    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        if paths::has_link_suffix(&path.to_string_lossy()) {
            return shortcut_target(path);
        }
        let meta = fs::symlink_metadata(path).ok()?;
        if !meta.file_type().is_symlink() {
            return None;
        }
        match fs::canonicalize(path) {
            Ok(target) => Some(target),
            Err(e) => {
                tracing::debug!("Dangling link {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Target of a shell shortcut: its local base path, else its relative path
/// taken from the shortcut's own folder.
fn shortcut_target(path: &Path) -> Option<PathBuf> {
    let link = match lnk::ShellLink::open(path) {
        Ok(link) => link,
        Err(e) => {
            tracing::debug!("Unreadable shortcut {}: {:?}", path.display(), e);
            return None;
        }
    };
    let local = link
        .link_info()
        .as_ref()
        .and_then(|info| info.local_base_path().as_deref().map(PathBuf::from));
    local.or_else(|| {
        let relative = link.relative_path().as_deref()?;
        Some(paths::parent(path)?.join(relative))
    })
}
