use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;

use crate::location::VirtualRoot;
use crate::paths;

bitflags::bitflags! {
    /// Filesystem attributes of an entry row.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ItemAttrs: u8 {
        /// Entry is a folder (or a drive root)
        const DIRECTORY = 0x01;
        /// Entry is hidden (dot-name or hidden attribute)
        const HIDDEN = 0x02;
        /// Entry is a symlink or shell link
        const LINK = 0x04;
    }
}

/// Separator rows in the navigation pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorKind {
    /// Ends the fixed virtual-root rows
    Section,
    /// Ends the folder breadcrumb
    Hierarchy,
}

/// What a row stands for. The variants are exclusive, so a row can never be
/// both a separator and an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRole {
    /// A real filesystem entry (file, folder, drive, bookmark or history target)
    Entry,
    VirtualRoot(VirtualRoot),
    Separator(SeparatorKind),
    /// The single row shown in an otherwise empty file pane
    Empty,
}

/// Colour id meaning "no classification".
pub const UNCLASSIFIED: i32 = -1;

/// One row of a pane.
#[derive(Debug, Clone, PartialEq)]
pub struct FileItem {
    pub path: PathBuf,
    pub display_name: CompactString,
    pub last_write_time: Option<SystemTime>,
    /// Byte size, 0 for folders and structural rows
    pub size: u64,
    pub attrs: ItemAttrs,
    pub role: ItemRole,
    pub selected: bool,
    /// Colour classification from the type table
    pub color_tag: i32,
    /// Position in the bookmark/history list this row came from
    pub source_index: usize,
}

impl FileItem {
    /// A filesystem entry with no metadata filled in yet.
    pub fn entry(path: impl Into<PathBuf>, attrs: ItemAttrs) -> Self {
        let path = path.into();
        let name = paths::file_name(&path);
        let display_name = if attrs.contains(ItemAttrs::LINK) {
            CompactString::new(paths::strip_link_suffix(&name))
        } else {
            CompactString::new(&name)
        };
        Self {
            path,
            display_name,
            last_write_time: None,
            size: 0,
            attrs,
            role: ItemRole::Entry,
            selected: false,
            color_tag: UNCLASSIFIED,
            source_index: 0,
        }
    }

    pub fn virtual_root(root: VirtualRoot) -> Self {
        Self::structural(PathBuf::from(root.sentinel()), root.label(), ItemRole::VirtualRoot(root))
            .with_attrs(ItemAttrs::DIRECTORY)
    }

    pub fn separator(kind: SeparatorKind) -> Self {
        Self::structural(PathBuf::new(), "", ItemRole::Separator(kind))
    }

    pub fn empty_placeholder() -> Self {
        Self::structural(PathBuf::new(), "(empty)", ItemRole::Empty)
    }

    fn structural(path: PathBuf, name: &str, role: ItemRole) -> Self {
        Self {
            path,
            display_name: CompactString::new(name),
            last_write_time: None,
            size: 0,
            attrs: ItemAttrs::empty(),
            role,
            selected: false,
            color_tag: UNCLASSIFIED,
            source_index: 0,
        }
    }

    fn with_attrs(mut self, attrs: ItemAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = CompactString::new(name);
        self
    }

    pub fn with_source_index(mut self, index: usize) -> Self {
        self.source_index = index;
        self
    }

    pub fn is_directory(&self) -> bool {
        self.attrs.contains(ItemAttrs::DIRECTORY)
    }

    pub fn is_hidden(&self) -> bool {
        self.attrs.contains(ItemAttrs::HIDDEN)
    }

    pub fn is_link(&self) -> bool {
        self.attrs.contains(ItemAttrs::LINK)
    }

    pub fn is_separator(&self) -> bool {
        matches!(self.role, ItemRole::Separator(_))
    }

    pub fn is_empty_placeholder(&self) -> bool {
        self.role == ItemRole::Empty
    }

    /// Separators and the empty placeholder never take part in selection.
    pub fn is_selectable(&self) -> bool {
        !matches!(self.role, ItemRole::Separator(_) | ItemRole::Empty)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extension used by the Type sort and the type table. Taken from the path,
    /// so a shortcut keeps `lnk` after its display name drops the suffix.
    pub fn extension(&self) -> String {
        if self.is_directory() {
            String::new()
        } else {
            paths::extension_lower(&self.path.to_string_lossy())
        }
    }
}
