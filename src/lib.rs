// Public library interface for edgelist
// The console host and the debug tool both drive the engine through here

pub mod classify;
pub mod config;
pub mod error;
pub mod links;
pub mod list;
pub mod location;
pub mod nav;
pub mod ops;
pub mod options;
pub mod paths;
pub mod prefs;
pub mod size;
pub mod sources;
pub mod transition;

pub use error::{Error, Result};
pub use list::item::{FileItem, ItemAttrs, ItemRole, SeparatorKind};
pub use list::sort::SortField;
pub use list::ItemCollection;
pub use location::{Context, Location, VirtualRoot};
pub use nav::{NavigationState, Observer, PaneKind, Services};
pub use options::{DisplayOptions, HistorySort};
pub use transition::HierarchyTransition;
