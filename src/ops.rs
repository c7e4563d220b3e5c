//! Shell file operations over a working set.
//!
//! Each operation reports plain success. Multi-file operations stop at the
//! first failure and leave whatever was already done in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::list::item::{FileItem, ItemRole};

pub trait FileOperations {
    /// Copy every source into the folder `dest`.
    fn copy(&self, sources: &[PathBuf], dest: &Path) -> bool;
    /// Move every source into the folder `dest`.
    fn move_to(&self, sources: &[PathBuf], dest: &Path) -> bool;
    fn delete(&self, paths: &[PathBuf]) -> bool;
    /// Rename `path` in place to `new_name`.
    fn rename(&self, path: &Path, new_name: &str) -> bool;
    /// Create a link to `target` inside the folder `dest`.
    fn create_link(&self, target: &Path, dest: &Path) -> bool;
}

/// `FileOperations` on top of `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileOperations;

fn target_in(dest: &Path, src: &Path) -> PathBuf {
    dest.join(src.file_name().unwrap_or_default())
}

fn report(what: &str, result: io::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("{} failed: {}", what, e);
            false
        }
    }
}

impl FileOperations for StdFileOperations {
    fn copy(&self, sources: &[PathBuf], dest: &Path) -> bool {
        report(
            "Copy",
            sources.iter().try_for_each(|src| copy_into(src, &target_in(dest, src))),
        )
    }

    fn move_to(&self, sources: &[PathBuf], dest: &Path) -> bool {
        report(
            "Move",
            sources.iter().try_for_each(|src| relocate(src, &target_in(dest, src))),
        )
    }

    fn delete(&self, paths: &[PathBuf]) -> bool {
        report("Delete", paths.iter().try_for_each(|path| discard(path)))
    }

    fn rename(&self, path: &Path, new_name: &str) -> bool {
        if new_name.is_empty() || new_name.contains(['/', '\\']) {
            tracing::warn!("Refusing to rename {} to '{}'", path.display(), new_name);
            return false;
        }
        let target = match path.parent() {
            Some(parent) => parent.join(new_name),
            None => PathBuf::from(new_name),
        };
        if target.exists() {
            tracing::warn!("Rename target {} already exists", target.display());
            return false;
        }
        report("Rename", fs::rename(path, &target))
    }

    fn create_link(&self, target: &Path, dest: &Path) -> bool {
        report("Create link", make_link(target, &target_in(dest, target)))
    }
}

fn already_there(target: &Path) -> io::Result<()> {
    match fs::symlink_metadata(target) {
        Ok(_) => Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("{} already exists", target.display()))),
        Err(_) => Ok(()),
    }
}

/// Copy `src` to the new path `target`. Existing targets are never overwritten.
fn copy_into(src: &Path, target: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(src)?;
    if meta.is_dir() && target.starts_with(src) {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "cannot copy a folder into itself"));
    }
    already_there(target)?;
    copy_tree(src, target, &meta)
}

/// Symlinks are recreated as links rather than followed.
fn copy_tree(src: &Path, target: &Path, meta: &fs::Metadata) -> io::Result<()> {
    let kind = meta.file_type();
    if kind.is_symlink() {
        make_link(&fs::read_link(src)?, target)
    } else if kind.is_dir() {
        fs::create_dir(target)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_tree(&entry.path(), &target.join(entry.file_name()), &entry.metadata()?)?;
        }
        Ok(())
    } else {
        fs::copy(src, target).map(|_| ())
    }
}

/// Rename when the filesystem allows it, else copy and discard the source.
fn relocate(src: &Path, target: &Path) -> io::Result<()> {
    already_there(target)?;
    if let Err(e) = fs::rename(src, target) {
        tracing::debug!("Rename {} failed ({}), copying instead", src.display(), e);
        copy_into(src, target)?;
        discard(src)?;
    }
    Ok(())
}

/// Remove a file, a link or a whole folder. Links are removed, never followed.
fn discard(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn make_link(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "links are not supported on this platform"))
}

/// Commands that act on a whole working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Copy,
    Move,
    Delete,
    CreateLink,
}

impl Operation {
    pub fn needs_destination(self) -> bool {
        !matches!(self, Operation::Delete)
    }
}

/// Run `op` over the entry rows of `working_set`.
///
/// Structural rows are skipped. An empty set is a no-op returning `false`;
/// a missing destination for an operation that needs one is a caller error.
pub fn apply(
    fs_ops: &dyn FileOperations,
    op: Operation,
    working_set: &[FileItem],
    dest: Option<&Path>,
) -> Result<bool> {
    let sources: Vec<PathBuf> = working_set
        .iter()
        .filter(|item| item.role == ItemRole::Entry)
        .map(|item| item.path.clone())
        .collect();
    if sources.is_empty() {
        return Ok(false);
    }
    let dest = match (op.needs_destination(), dest) {
        (true, None) => return Err(Error::InvalidState("operation needs a destination folder")),
        (_, dest) => dest,
    };

    tracing::info!("{:?} on {} items", op, sources.len());
    let ok = match (op, dest) {
        (Operation::Delete, _) => fs_ops.delete(&sources),
        (Operation::Copy, Some(dest)) => fs_ops.copy(&sources, dest),
        (Operation::Move, Some(dest)) => fs_ops.move_to(&sources, dest),
        (Operation::CreateLink, Some(dest)) => sources.iter().all(|src| fs_ops.create_link(src, dest)),
        (_, None) => false,
    };
    Ok(ok)
}
