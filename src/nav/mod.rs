//! The navigation document: current location, both panes, and the commands
//! that move between folders and virtual roots.
//!
//! Every mutating command ends in a full rebuild. A rebuild clears both panes,
//! repopulates them from the filesystem or a navigation source, sorts, and then
//! notifies the observer exactly once.

pub mod entries;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context as _;

use crate::classify::{TypeClassifier, TypeTable, FOLDER_KEY};
use crate::config::AppConfig;
use crate::error::Result;
use crate::links::{FsLinkResolver, LinkResolver};
use crate::list::item::{FileItem, ItemAttrs, ItemRole, SeparatorKind};
use crate::list::sort::SortField;
use crate::list::ItemCollection;
use crate::location::{Context, Location, VirtualRoot};
use crate::options::{DisplayOptions, HistorySort};
use crate::paths;
use crate::prefs::Preferences;
use crate::sources::{
    listfile, Bookmarks, CachedMounts, DriveContext, Drives, History, MountSource, SystemMounts, VolumeProbe,
};

/// Which of the two lists a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Navigation,
    File,
}

/// Receives one call per completed rebuild.
pub trait Observer {
    fn on_updated(&mut self);
}

impl<F: FnMut()> Observer for F {
    fn on_updated(&mut self) {
        self()
    }
}

/// External collaborators the document consults while rebuilding.
pub struct Services {
    pub classifier: Box<dyn TypeClassifier>,
    pub links: Box<dyn LinkResolver>,
    pub mounts: Box<dyn MountSource>,
    pub volumes: Box<dyn VolumeProbe>,
}

impl Services {
    /// OS-backed services. Drive listing and the removable check share one mount
    /// table, re-read by the removable check once it is older than `mount_cache`.
    pub fn system(mount_cache: Duration) -> Self {
        let table = Rc::new(CachedMounts::new(SystemMounts, mount_cache));
        Self {
            classifier: Box::new(TypeTable::new()),
            links: Box::new(FsLinkResolver),
            mounts: Box::new(Rc::clone(&table)),
            volumes: Box::new(table),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::system(Duration::from_millis(AppConfig::DEFAULT_MOUNT_CACHE_MS))
    }
}

pub struct NavigationState {
    current: Location,
    last: Option<Location>,
    nav_pane: ItemCollection,
    file_pane: ItemCollection,
    bookmarks: Bookmarks,
    history: History,
    drives: Drives,
    drive_ctx: DriveContext,
    options: DisplayOptions,
    services: Services,
    observer: Option<Box<dyn Observer>>,
}

impl NavigationState {
    /// An empty document sitting on the Drives root. Nothing is listed until the
    /// first `set_current_directory` or `refresh`.
    pub fn new(bookmarks: Bookmarks, history: History, drive_ctx: DriveContext, services: Services) -> Self {
        Self {
            current: Location::Virtual(VirtualRoot::Drives),
            last: None,
            nav_pane: ItemCollection::new(),
            file_pane: ItemCollection::new(),
            bookmarks,
            history,
            drives: Drives::new(),
            drive_ctx,
            options: DisplayOptions::default(),
            services,
            observer: None,
        }
    }

    /// Restore bookmarks, history and options.
    ///
    /// List files win; when one is absent the legacy `[Favorites] Fav<n>` or
    /// `[History] Hist<n>` preference list is used instead.
    pub fn load(config: &AppConfig, prefs: &dyn Preferences, services: Services) -> anyhow::Result<Self> {
        let bookmarks = load_list(&config.bookmarks_file, prefs, "Favorites", "Fav", config.max_bookmarks)?;
        let history = load_list(&config.history_file, prefs, "History", "Hist", config.max_history)?;
        tracing::info!("Loaded {} bookmarks, {} history entries", bookmarks.len(), history.len());

        let mut state = Self::new(
            Bookmarks::with_entries(bookmarks, config.max_bookmarks),
            History::with_entries(history, config.max_history),
            DriveContext::new(config.slow_probe),
            services,
        );
        state.options = DisplayOptions::load(prefs);
        Ok(state)
    }

    /// Write both list files in full and store the display options.
    pub fn save(&self, config: &AppConfig, prefs: &mut dyn Preferences) -> anyhow::Result<()> {
        listfile::write_list(&config.bookmarks_file, self.bookmarks.entries())
            .with_context(|| format!("Failed to save bookmarks to {}", config.bookmarks_file.display()))?;
        listfile::write_list(&config.history_file, self.history.entries())
            .with_context(|| format!("Failed to save history to {}", config.history_file.display()))?;
        self.options.save(prefs);
        tracing::info!("Saved {} bookmarks, {} history entries", self.bookmarks.len(), self.history.len());
        Ok(())
    }

    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn set_options(&mut self, options: DisplayOptions) {
        self.options = options;
    }

    // ---- Accessors ----

    pub fn current(&self) -> &Location {
        &self.current
    }

    pub fn last(&self) -> Option<&Location> {
        self.last.as_ref()
    }

    pub fn context(&self) -> Context {
        self.current.context()
    }

    pub fn pane(&self, pane: PaneKind) -> &ItemCollection {
        match pane {
            PaneKind::Navigation => &self.nav_pane,
            PaneKind::File => &self.file_pane,
        }
    }

    fn pane_mut(&mut self, pane: PaneKind) -> &mut ItemCollection {
        match pane {
            PaneKind::Navigation => &mut self.nav_pane,
            PaneKind::File => &mut self.file_pane,
        }
    }

    pub fn nav_pane(&self) -> &ItemCollection {
        &self.nav_pane
    }

    pub fn file_pane(&self) -> &ItemCollection {
        &self.file_pane
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn drives(&self) -> &Drives {
        &self.drives
    }

    pub fn drive_context(&self) -> &DriveContext {
        &self.drive_ctx
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn classifier(&self) -> &dyn TypeClassifier {
        self.services.classifier.as_ref()
    }

    // ---- Navigation ----

    /// Adopt `location` and rebuild. The previous location is remembered when it
    /// differs; an ordinary folder that ends up current is recorded in History.
    pub fn set_current_directory(&mut self, location: impl Into<Location>) {
        let previous = std::mem::replace(&mut self.current, location.into());
        // the rebuild may settle on an ancestor; `last` follows where we ended up
        self.update_lists();
        if self.current != previous {
            tracing::info!("Navigating to {}", self.current);
            self.last = Some(previous);
        }
        if let Location::Folder(path) = &self.current {
            self.history.add(path, self.services.volumes.as_ref());
        }
    }

    /// Go back to the location held before the last change.
    pub fn return_to_last(&mut self) -> bool {
        match self.last.clone() {
            Some(last) => {
                self.set_current_directory(last);
                true
            }
            None => false,
        }
    }

    pub fn refresh(&mut self) {
        self.update_lists();
    }

    /// Descend into the row at `index`, or reveal a file's folder where that applies.
    pub fn move_to_lower(&mut self, pane: PaneKind, index: usize) -> Result<bool> {
        match self.lower_target(pane, index)? {
            Some(target) => {
                self.set_current_directory(target);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether `move_to_lower` would navigate, without doing it.
    pub fn movable_to_lower(&self, pane: PaneKind, index: usize) -> Result<bool> {
        Ok(self.lower_target(pane, index)?.is_some())
    }

    fn lower_target(&self, pane: PaneKind, index: usize) -> Result<Option<Location>> {
        let item = self.pane(pane).get(index)?;
        match item.role {
            ItemRole::Empty | ItemRole::Separator(_) => return Ok(None),
            ItemRole::VirtualRoot(root) => return Ok(Some(Location::Virtual(root))),
            ItemRole::Entry => {}
        }

        if item.is_directory() {
            let target = if item.is_link() {
                self.services.links.resolve(&item.path).unwrap_or_else(|| item.path.clone())
            } else {
                item.path.clone()
            };
            return Ok(Some(Location::Folder(target)));
        }
        if item.is_link() {
            let revealed = self.services.links.resolve(&item.path).and_then(|target| paths::parent(&target));
            return Ok(revealed.map(Location::Folder));
        }
        match self.context() {
            Context::Bookmarks | Context::History => Ok(paths::parent(&item.path).map(Location::Folder)),
            Context::OrdinaryFolder | Context::Drives => Ok(None),
        }
    }

    // ---- Selection and working sets ----

    pub fn select_file(&mut self, front: usize, back: usize, pane: PaneKind, all: bool) -> Result<()> {
        self.pane_mut(pane).select(front, back, all)
    }

    pub fn unselect(&mut self, pane: PaneKind) {
        self.pane_mut(pane).unselect();
    }

    /// Fill `sink` with the rows a shell command should act on: the row at
    /// `index` first, then every other selected row when that row is selected.
    pub fn set_operator(&self, index: Option<usize>, pane: PaneKind, sink: &mut Vec<FileItem>) -> Result<()> {
        let Some(index) = index else {
            return Ok(());
        };
        let list = self.pane(pane);
        let anchor = list.get(index)?;
        sink.clear();
        sink.push(anchor.clone());
        if anchor.selected {
            let rows = list.as_slice();
            sink.extend(list.selected_indices().filter(|&i| i != index).map(|i| rows[i].clone()));
        }
        Ok(())
    }

    // ---- Bookmarks and history ----

    /// Reorder bookmarks by dragging the file-pane row `drag` onto row `drop`.
    pub fn arrange_favorites(&mut self, drag: Option<usize>, drop: Option<usize>) -> Result<bool> {
        if self.context() != Context::Bookmarks {
            return Ok(false);
        }
        let (Some(drag), Some(drop)) = (drag, drop) else {
            return Ok(false);
        };
        if drag == drop {
            return Ok(false);
        }
        let from = self.file_pane.get(drag)?;
        let to = self.file_pane.get(drop)?;
        if from.role != ItemRole::Entry || to.role != ItemRole::Entry {
            return Ok(false);
        }
        let (from, to) = (from.source_index, to.source_index);
        let moved = self.bookmarks.arrange(from, to);
        if moved {
            self.update_lists();
        }
        Ok(moved)
    }

    /// Remove the bookmark under a file-pane row while in Bookmarks, otherwise
    /// bookmark `path`. Rebuilds either way.
    pub fn add_or_remove_favorite(&mut self, path: impl AsRef<Path>, pane: PaneKind, index: Option<usize>) -> Result<bool> {
        let changed = if self.context() == Context::Bookmarks && pane == PaneKind::File {
            match index {
                Some(index) => {
                    let row = self.file_pane.get(index)?;
                    let (role, source) = (row.role, row.source_index);
                    role == ItemRole::Entry && self.bookmarks.remove(source).is_some()
                }
                None => false,
            }
        } else {
            self.bookmarks.add(path)
        };
        self.update_lists();
        Ok(changed)
    }

    pub fn clear_history(&mut self) {
        tracing::info!("Clearing {} history entries", self.history.len());
        self.history.clear();
        self.update_lists();
    }

    // ---- Options ----

    pub fn set_sort(&mut self, field: SortField, reverse: bool) {
        self.options.sort_field = field;
        self.options.sort_reverse = reverse;
        self.update_lists();
    }

    pub fn set_show_hidden(&mut self, show_hidden: bool) {
        self.options.show_hidden = show_hidden;
        self.update_lists();
    }

    pub fn set_history_sort(&mut self, history_sort: HistorySort) {
        self.options.history_sort = history_sort;
        self.update_lists();
    }

    // ---- Rebuild ----

    /// Recompute both panes from scratch and notify the observer.
    fn update_lists(&mut self) {
        self.nav_pane.clear();
        self.file_pane.clear();

        for root in VirtualRoot::ALL {
            self.nav_pane.add(FileItem::virtual_root(root));
        }
        self.nav_pane.add(FileItem::separator(SeparatorKind::Section));

        self.resolve_current();
        match self.current.clone() {
            Location::Folder(dir) => self.build_folder(&dir),
            Location::Virtual(VirtualRoot::Bookmarks) => self.build_bookmarks(),
            Location::Virtual(VirtualRoot::History) => self.build_history(),
            Location::Virtual(VirtualRoot::Drives) => self.build_drives(),
        }

        if self.file_pane.is_empty() {
            self.file_pane.add(FileItem::empty_placeholder());
        }

        tracing::debug!(
            "Rebuilt {}: {} navigation rows, {} file rows",
            self.current,
            self.nav_pane.len(),
            self.file_pane.len()
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.on_updated();
        }
    }

    /// Walk a missing folder up to its nearest existing ancestor, or fall back to Drives.
    fn resolve_current(&mut self) {
        let Location::Folder(path) = self.current.clone() else {
            return;
        };
        let mut candidate = path.clone();
        loop {
            if candidate.is_dir() {
                if candidate != path {
                    tracing::info!("{} is gone, showing {}", path.display(), candidate.display());
                    self.current = Location::Folder(candidate);
                }
                return;
            }
            match paths::parent(&candidate) {
                Some(up) => candidate = up,
                None => {
                    tracing::warn!("No existing ancestor of {}, showing drives", path.display());
                    self.current = Location::Virtual(VirtualRoot::Drives);
                    return;
                }
            }
        }
    }

    fn build_folder(&mut self, dir: &Path) {
        let classifier = self.services.classifier.as_ref();
        for ancestor in paths::ancestors_root_first(dir) {
            self.nav_pane.add(entries::folder_row(&ancestor, classifier));
        }
        self.nav_pane.add(FileItem::separator(SeparatorKind::Hierarchy));

        for item in entries::read_folder(dir, self.options.show_hidden, self.services.links.as_ref(), classifier) {
            self.file_pane.add(item);
        }
        self.file_pane.sort(self.options.sort_field, self.options.sort_reverse);
    }

    fn build_bookmarks(&mut self) {
        let (links, classifier) = (self.services.links.as_ref(), self.services.classifier.as_ref());
        for (i, path) in self.bookmarks.entries().iter().enumerate() {
            self.file_pane.add(entries::describe(path, links, classifier).with_source_index(i));
        }
    }

    fn build_history(&mut self) {
        self.history.clean_up();
        let (links, classifier) = (self.services.links.as_ref(), self.services.classifier.as_ref());
        for (i, path) in self.history.entries().iter().enumerate() {
            self.file_pane.add(entries::describe(path, links, classifier).with_source_index(i));
        }
        let policy = self.options.history_sort;
        if policy.enabled {
            self.file_pane.sort(policy.field, policy.reverse);
        }
    }

    fn build_drives(&mut self) {
        self.drives.refresh(self.services.mounts.as_ref(), &mut self.drive_ctx);
        let color = self.services.classifier.color_for(FOLDER_KEY);
        for (i, drive) in self.drives.entries().iter().enumerate() {
            let mut item = FileItem::entry(&drive.root, ItemAttrs::DIRECTORY)
                .with_display_name(&drive.label)
                .with_source_index(i);
            item.color_tag = color;
            self.file_pane.add(item);
        }
    }
}

fn load_list(
    file: &Path,
    prefs: &dyn Preferences,
    section: &str,
    prefix: &str,
    max: usize,
) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(entries) = listfile::read_list(file, max)? {
        return Ok(entries);
    }
    let legacy = prefs.get_string_list(section, prefix, max);
    if !legacy.is_empty() {
        tracing::info!("Using legacy [{}] list ({} entries)", section, legacy.len());
    }
    Ok(legacy.into_iter().map(PathBuf::from).collect())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::prefs::TomlPreferences;
    use crate::sources::MountInfo;

    struct FakeMounts(Vec<&'static str>);

    impl MountSource for FakeMounts {
        fn mounts(&self) -> Vec<MountInfo> {
            self.0
                .iter()
                .map(|root| MountInfo {
                    root: PathBuf::from(root),
                    label: format!("Disk {}", root),
                    removable: false,
                    total_bytes: 0,
                    available_bytes: 0,
                })
                .collect()
        }
    }

    /// Mount table with explicit removable flags.
    struct TableMounts(Vec<(PathBuf, bool)>);

    impl MountSource for TableMounts {
        fn mounts(&self) -> Vec<MountInfo> {
            self.0
                .iter()
                .map(|(root, removable)| MountInfo {
                    root: root.clone(),
                    label: root.display().to_string(),
                    removable: *removable,
                    total_bytes: 0,
                    available_bytes: 0,
                })
                .collect()
        }
    }

    struct NothingRemovable;

    impl VolumeProbe for NothingRemovable {
        fn is_removable(&self, _path: &Path) -> bool {
            false
        }
    }

    fn services() -> Services {
        Services {
            classifier: Box::new(TypeTable::new()),
            links: Box::new(FsLinkResolver),
            mounts: Box::new(FakeMounts(vec!["D:\\", "C:\\"])),
            volumes: Box::new(NothingRemovable),
        }
    }

    fn state_with(bookmarks: &[&Path]) -> NavigationState {
        NavigationState::new(
            Bookmarks::with_entries(bookmarks.iter().map(|p| p.to_path_buf()).collect(), 100),
            History::new(30),
            DriveContext::new(Duration::from_millis(500)),
            services(),
        )
    }

    fn names(pane: &ItemCollection) -> Vec<String> {
        pane.iter().map(|item| item.display_name.to_string()).collect()
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("b.txt"), "bb").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        dir
    }

    #[test]
    fn folder_rebuild_lays_out_both_panes() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());

        assert_eq!(state.context(), Context::OrdinaryFolder);
        let nav = state.nav_pane().as_slice();
        assert_eq!(nav[0].role, ItemRole::VirtualRoot(VirtualRoot::Bookmarks));
        assert_eq!(nav[1].role, ItemRole::VirtualRoot(VirtualRoot::History));
        assert_eq!(nav[2].role, ItemRole::VirtualRoot(VirtualRoot::Drives));
        assert_eq!(nav[3].role, ItemRole::Separator(SeparatorKind::Section));
        let last = nav.len() - 1;
        assert_eq!(nav[last].role, ItemRole::Separator(SeparatorKind::Hierarchy));
        assert_eq!(nav[last - 1].path, dir.path());
        assert!(paths::is_root(&nav[4].path));

        assert_eq!(names(state.file_pane()), ["alpha", "beta", "a.txt", "b.txt"]);
    }

    #[test]
    fn rebuilding_the_same_folder_is_idempotent() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());
        let nav = names(state.nav_pane());
        let files = names(state.file_pane());

        state.set_current_directory(dir.path());
        assert_eq!(names(state.nav_pane()), nav);
        assert_eq!(names(state.file_pane()), files);
    }

    #[test]
    fn option_commands_rebuild_with_new_settings() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());

        state.set_show_hidden(true);
        assert!(names(state.file_pane()).contains(&".hidden".to_string()));

        state.set_show_hidden(false);
        state.set_sort(SortField::Size, true);
        assert_eq!(names(state.file_pane()), ["beta", "alpha", "b.txt", "a.txt"]);
    }

    #[test]
    fn empty_folder_shows_only_the_placeholder() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".only-hidden"), "").unwrap();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());

        assert_eq!(state.file_pane().len(), 1);
        assert!(state.file_pane().get(0).unwrap().is_empty_placeholder());
        assert!(!state.movable_to_lower(PaneKind::File, 0).unwrap());
        assert!(!state.move_to_lower(PaneKind::File, 0).unwrap());

        state.select_file(0, 0, PaneKind::File, false).unwrap();
        assert_eq!(state.file_pane().selected_count(), 0);
    }

    #[test]
    fn missing_folder_falls_back_to_nearest_ancestor() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path().join("alpha").join("gone").join("deeper"));
        assert_eq!(state.current(), &Location::Folder(dir.path().join("alpha")));
    }

    #[test]
    fn fallback_to_the_same_folder_keeps_the_last_location() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());
        state.set_current_directory(dir.path().join("alpha"));
        state.set_current_directory(dir.path().join("alpha").join("missing"));

        assert_eq!(state.current(), &Location::Folder(dir.path().join("alpha")));
        assert_eq!(state.last(), Some(&Location::Folder(dir.path().to_path_buf())));
        assert!(state.return_to_last());
        assert_eq!(state.current(), &Location::Folder(dir.path().to_path_buf()));
    }

    #[test]
    fn folder_without_any_ancestor_falls_back_to_drives() {
        let mut state = state_with(&[]);
        state.set_current_directory(PathBuf::from("no-such-relative-folder"));
        assert_eq!(state.context(), Context::Drives);
        assert_eq!(names(state.file_pane()), ["Disk C:\\", "Disk D:\\"]);
        assert!(state.file_pane().iter().all(|item| item.is_directory()));
    }

    #[test]
    fn move_to_lower_descends_and_rejects_plain_files() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());

        // rows: alpha, beta, a.txt, b.txt
        assert!(!state.movable_to_lower(PaneKind::File, 2).unwrap());
        assert!(!state.move_to_lower(PaneKind::File, 2).unwrap());

        assert!(state.movable_to_lower(PaneKind::File, 0).unwrap());
        assert!(state.move_to_lower(PaneKind::File, 0).unwrap());
        assert_eq!(state.current(), &Location::Folder(dir.path().join("alpha")));
        assert_eq!(state.last(), Some(&Location::Folder(dir.path().to_path_buf())));

        assert!(state.return_to_last());
        assert_eq!(state.current(), &Location::Folder(dir.path().to_path_buf()));
    }

    #[test]
    fn bad_indices_are_reported() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());
        assert!(state.movable_to_lower(PaneKind::File, 99).is_err());
        assert!(state.select_file(0, 99, PaneKind::File, true).is_err());
        assert!(state.set_operator(Some(99), PaneKind::File, &mut Vec::new()).is_err());
    }

    #[test]
    fn virtual_root_rows_switch_context() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());

        assert!(state.move_to_lower(PaneKind::Navigation, 2).unwrap());
        assert_eq!(state.context(), Context::Drives);
        assert!(!state.movable_to_lower(PaneKind::Navigation, 3).unwrap());
    }

    #[test]
    fn files_in_bookmarks_reveal_their_folder() {
        let dir = sample_tree();
        let file = dir.path().join("a.txt");
        let mut state = state_with(&[file.as_path()]);
        state.set_current_directory(VirtualRoot::Bookmarks);

        assert!(state.move_to_lower(PaneKind::File, 0).unwrap());
        assert_eq!(state.current(), &Location::Folder(dir.path().to_path_buf()));
    }

    #[cfg(unix)]
    #[test]
    fn links_to_files_reveal_the_target_folder() {
        let dir = sample_tree();
        let link = dir.path().join("beta").join("shortcut");
        std::os::unix::fs::symlink(dir.path().join("a.txt"), &link).unwrap();

        let mut state = state_with(&[]);
        state.set_current_directory(dir.path().join("beta"));
        assert!(state.file_pane().get(0).unwrap().is_link());
        assert!(state.move_to_lower(PaneKind::File, 0).unwrap());
        assert_eq!(state.current(), &Location::Folder(fs::canonicalize(dir.path()).unwrap()));
    }

    #[test]
    fn set_operator_puts_the_anchor_first() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());

        let mut sink = vec![FileItem::empty_placeholder()];
        state.set_operator(None, PaneKind::File, &mut sink).unwrap();
        assert_eq!(sink.len(), 1);

        state.set_operator(Some(3), PaneKind::File, &mut sink).unwrap();
        assert_eq!(sink.iter().map(|i| i.display_name.as_str()).collect::<Vec<_>>(), ["b.txt"]);

        state.select_file(0, 0, PaneKind::File, false).unwrap();
        state.select_file(2, 3, PaneKind::File, true).unwrap();
        state.set_operator(Some(2), PaneKind::File, &mut sink).unwrap();
        assert_eq!(
            sink.iter().map(|i| i.display_name.as_str()).collect::<Vec<_>>(),
            ["a.txt", "alpha", "b.txt"]
        );
    }

    #[test]
    fn arrange_favorites_maps_rows_to_source_indices() {
        let mut state = state_with(&[Path::new("C:\\A"), Path::new("C:\\B"), Path::new("C:\\C")]);
        assert!(!state.arrange_favorites(Some(2), Some(0)).unwrap());

        state.set_current_directory(VirtualRoot::Bookmarks);
        assert!(!state.arrange_favorites(Some(1), Some(1)).unwrap());
        assert!(!state.arrange_favorites(None, Some(0)).unwrap());
        assert!(state.arrange_favorites(Some(2), Some(0)).unwrap());
        assert_eq!(
            state.bookmarks().entries(),
            [PathBuf::from("C:\\C"), PathBuf::from("C:\\A"), PathBuf::from("C:\\B")]
        );
        assert_eq!(state.file_pane().get(0).unwrap().source_index, 0);
        assert_eq!(state.file_pane().get(0).unwrap().path, PathBuf::from("C:\\C"));
    }

    #[test]
    fn favorites_are_added_outside_and_removed_inside_bookmarks() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path());

        assert!(state.add_or_remove_favorite(dir.path(), PaneKind::File, None).unwrap());
        assert_eq!(state.bookmarks().entries(), [dir.path().to_path_buf()]);

        state.set_current_directory(VirtualRoot::Bookmarks);
        assert_eq!(state.file_pane().len(), 1);
        assert!(state.add_or_remove_favorite(dir.path(), PaneKind::File, Some(0)).unwrap());
        assert!(state.bookmarks().is_empty());
        assert!(state.file_pane().get(0).unwrap().is_empty_placeholder());
    }

    #[test]
    fn history_records_folders_and_purges_stale_ones() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path().join("alpha"));
        state.set_current_directory(dir.path().join("beta"));
        assert_eq!(state.history().entries(), [dir.path().join("beta"), dir.path().join("alpha")]);

        fs::remove_dir(dir.path().join("alpha")).unwrap();
        state.set_current_directory(VirtualRoot::History);
        assert_eq!(state.history().len(), 1);
        assert_eq!(names(state.file_pane()), ["beta"]);

        state.clear_history();
        assert!(state.history().is_empty());
        assert!(state.file_pane().get(0).unwrap().is_empty_placeholder());
    }

    #[cfg(unix)]
    #[test]
    fn folders_on_removable_mounts_stay_out_of_history() {
        let dir = sample_tree();
        let usb = dir.path().join("usb");
        fs::create_dir_all(usb.join("photos")).unwrap();

        let table = Rc::new(CachedMounts::new(
            TableMounts(vec![(PathBuf::from("/"), false), (usb.clone(), true)]),
            Duration::from_secs(3600),
        ));
        let mut state = NavigationState::new(
            Bookmarks::new(100),
            History::new(30),
            DriveContext::new(Duration::from_millis(500)),
            Services {
                classifier: Box::new(TypeTable::new()),
                links: Box::new(FsLinkResolver),
                mounts: Box::new(Rc::clone(&table)),
                volumes: Box::new(table),
            },
        );

        state.set_current_directory(usb.join("photos"));
        assert_eq!(state.current(), &Location::Folder(usb.join("photos")));
        assert!(state.history().is_empty());

        state.set_current_directory(dir.path().join("alpha"));
        assert_eq!(state.history().entries(), [dir.path().join("alpha")]);
    }

    #[test]
    fn history_sort_applies_only_when_enabled() {
        let dir = sample_tree();
        let mut state = state_with(&[]);
        state.set_current_directory(dir.path().join("alpha"));
        state.set_current_directory(dir.path().join("beta"));
        state.set_current_directory(VirtualRoot::History);
        assert_eq!(names(state.file_pane()), ["beta", "alpha"]);

        state.set_history_sort(HistorySort { enabled: true, field: SortField::Name, reverse: false });
        assert_eq!(names(state.file_pane()), ["alpha", "beta"]);
    }

    #[test]
    fn observer_fires_once_per_rebuild() {
        let dir = sample_tree();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut state = state_with(&[]);
        state.set_observer(Box::new(move || counter.set(counter.get() + 1)));

        state.set_current_directory(dir.path());
        assert_eq!(calls.get(), 1);
        state.refresh();
        state.set_sort(SortField::Date, false);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn load_and_save_round_trip() {
        let home = TempDir::new().unwrap();
        let mut prefs = TomlPreferences::new();
        prefs.set_string_list("Favorites", "Fav", &["C:\\Legacy".into()]);
        let config = AppConfig::from_prefs(home.path(), &prefs);

        let mut state = NavigationState::load(&config, &prefs, services()).unwrap();
        assert_eq!(state.bookmarks().entries(), [PathBuf::from("C:\\Legacy")]);

        state.set_sort(SortField::Type, true);
        state.add_or_remove_favorite("C:\\New", PaneKind::Navigation, None).unwrap();
        state.save(&config, &mut prefs).unwrap();

        let restored = NavigationState::load(&config, &prefs, services()).unwrap();
        assert_eq!(
            restored.bookmarks().entries(),
            [PathBuf::from("C:\\Legacy"), PathBuf::from("C:\\New")]
        );
        assert_eq!(restored.options().sort_field, SortField::Type);
        assert!(restored.options().sort_reverse);
    }
}
