//! Navigation sources: the lists the file pane is built from when the document
//! sits on a virtual root.

pub mod bookmarks;
pub mod drives;
pub mod history;
pub mod listfile;

pub use bookmarks::Bookmarks;
pub use drives::{
    CachedMounts, DriveContext, DriveEntry, Drives, MountInfo, MountSource, SystemMounts, VolumeProbe,
};
pub use history::History;
