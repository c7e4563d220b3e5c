//! Turning filesystem entries into pane rows.

use std::fs;
use std::path::Path;

use crate::classify::{TypeClassifier, FOLDER_KEY};
use crate::links::LinkResolver;
use crate::list::item::{FileItem, ItemAttrs};
use crate::paths;

#[cfg(windows)]
fn has_hidden_attribute(meta: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    use windows::Win32::Storage::FileSystem::FILE_ATTRIBUTE_HIDDEN;

    meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN.0 != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_meta: &fs::Metadata) -> bool {
    false
}

fn is_hidden(path: &Path, meta: Option<&fs::Metadata>) -> bool {
    let name = paths::file_name(path);
    (name.starts_with('.') && name != "." && name != "..") || meta.is_some_and(has_hidden_attribute)
}

/// Stat `path` and build its row. Missing paths still produce a row with no metadata.
pub fn describe(path: &Path, links: &dyn LinkResolver, classifier: &dyn TypeClassifier) -> FileItem {
    let meta = fs::metadata(path).ok();
    let own_meta = fs::symlink_metadata(path).ok();

    let mut attrs = ItemAttrs::empty();
    if meta.as_ref().is_some_and(|m| m.is_dir()) {
        attrs |= ItemAttrs::DIRECTORY;
    }
    if links.is_link(path) {
        attrs |= ItemAttrs::LINK;
        if !attrs.contains(ItemAttrs::DIRECTORY) && links.resolve(path).is_some_and(|t| t.is_dir()) {
            attrs |= ItemAttrs::DIRECTORY;
        }
    }
    if is_hidden(path, own_meta.as_ref()) {
        attrs |= ItemAttrs::HIDDEN;
    }

    let mut item = FileItem::entry(path, attrs);
    if let Some(meta) = &meta {
        item.last_write_time = meta.modified().ok();
        if !item.is_directory() {
            item.size = meta.len();
        }
    }
    item.color_tag = if item.is_directory() {
        classifier.color_for(FOLDER_KEY)
    } else {
        classifier.color_for(&item.extension())
    };
    item
}

/// Rows for the immediate children of `dir`, hidden ones dropped unless `show_hidden`.
/// An unreadable folder yields no rows.
pub fn read_folder(
    dir: &Path,
    show_hidden: bool,
    links: &dyn LinkResolver,
    classifier: &dyn TypeClassifier,
) -> Vec<FileItem> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            tracing::warn!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    let mut items = Vec::new();
    for entry in read.flatten() {
        let name = entry.file_name();
        if name == "." || name == ".." {
            continue;
        }
        let item = describe(&entry.path(), links, classifier);
        if item.is_hidden() && !show_hidden {
            continue;
        }
        items.push(item);
    }
    items
}

/// A breadcrumb row for an ancestor folder; no stat needed.
pub fn folder_row(path: &Path, classifier: &dyn TypeClassifier) -> FileItem {
    let mut item = FileItem::entry(path, ItemAttrs::DIRECTORY);
    item.color_tag = classifier.color_for(FOLDER_KEY);
    item
}
