use std::fmt;
use std::path::{Path, PathBuf};

/// Pseudo-folders that are addressed by a sentinel path instead of a real location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualRoot {
    Bookmarks,
    History,
    Drives,
}

impl VirtualRoot {
    /// Display order of the fixed navigation-pane rows.
    pub const ALL: [VirtualRoot; 3] = [VirtualRoot::Bookmarks, VirtualRoot::History, VirtualRoot::Drives];

    /// Sentinel pseudo-path. None of these can name a real folder.
    pub fn sentinel(self) -> &'static str {
        match self {
            VirtualRoot::Bookmarks => "::bookmarks",
            VirtualRoot::History => "::history",
            VirtualRoot::Drives => "::drives",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VirtualRoot::Bookmarks => "Bookmarks",
            VirtualRoot::History => "History",
            VirtualRoot::Drives => "Drives",
        }
    }

    pub fn from_sentinel(path: &Path) -> Option<Self> {
        let s = path.to_str()?;
        Self::ALL.into_iter().find(|root| root.sentinel() == s)
    }
}

/// Where the document currently points: a real folder or one of the virtual roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Folder(PathBuf),
    Virtual(VirtualRoot),
}

impl Location {
    /// Map a path (possibly a sentinel) to a location.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match VirtualRoot::from_sentinel(path) {
            Some(root) => Location::Virtual(root),
            None => Location::Folder(path.to_path_buf()),
        }
    }

    /// The path form of this location; virtual roots yield their sentinel.
    pub fn to_path(&self) -> PathBuf {
        match self {
            Location::Folder(path) => path.clone(),
            Location::Virtual(root) => PathBuf::from(root.sentinel()),
        }
    }

    pub fn context(&self) -> Context {
        match self {
            Location::Folder(_) => Context::OrdinaryFolder,
            Location::Virtual(VirtualRoot::Bookmarks) => Context::Bookmarks,
            Location::Virtual(VirtualRoot::History) => Context::History,
            Location::Virtual(VirtualRoot::Drives) => Context::Drives,
        }
    }

    pub fn folder(&self) -> Option<&Path> {
        match self {
            Location::Folder(path) => Some(path),
            Location::Virtual(_) => None,
        }
    }
}

impl From<VirtualRoot> for Location {
    fn from(root: VirtualRoot) -> Self {
        Location::Virtual(root)
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::from_path(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::from_path(path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Folder(path) => write!(f, "{}", path.display()),
            Location::Virtual(root) => f.write_str(root.label()),
        }
    }
}

/// Which source the file pane is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    OrdinaryFolder,
    Bookmarks,
    History,
    Drives,
}
