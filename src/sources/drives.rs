use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::paths;

/// One mounted volume as reported by the OS.
#[derive(Debug, Clone)]
pub struct MountInfo {
    pub root: PathBuf,
    pub label: String,
    pub removable: bool,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Live mount table.
pub trait MountSource {
    fn mounts(&self) -> Vec<MountInfo>;

    /// Whether media is present and readable. May block on slow removable drives.
    fn probe_ready(&self, root: &Path) -> bool {
        std::fs::read_dir(root).is_ok()
    }
}

/// Answers whether a path lives on removable media.
pub trait VolumeProbe {
    fn is_removable(&self, path: &Path) -> bool;
}

/// The mount holding `path`.
///
/// Paths on a lettered drive match that drive's root. Everything else takes the
/// mount with the longest root that prefixes the path.
pub fn mount_for<'a>(mounts: &'a [MountInfo], path: &Path) -> Option<&'a MountInfo> {
    if let Some(root) = paths::drive_letter_root(path) {
        return mounts.iter().find(|m| paths::same_path(&m.root, &root));
    }
    mounts
        .iter()
        .filter(|m| path.starts_with(&m.root))
        .max_by_key(|m| m.root.as_os_str().len())
}

/// Mount table backed by `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMounts;

impl MountSource for SystemMounts {
    fn mounts(&self) -> Vec<MountInfo> {
        enumerate_mounts()
    }
}

/// Keeps the last mount table so removable-media checks do not query the OS
/// on every navigation.
///
/// `mounts()` always reads the source and replaces the kept table. The
/// removable check reuses the kept table until it is older than `max_age`.
pub struct CachedMounts<S> {
    source: S,
    max_age: Duration,
    table: RefCell<Option<(Instant, Vec<MountInfo>)>>,
}

impl<S: MountSource> CachedMounts<S> {
    pub fn new(source: S, max_age: Duration) -> Self {
        Self { source, max_age, table: RefCell::new(None) }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

impl<S: MountSource> MountSource for CachedMounts<S> {
    fn mounts(&self) -> Vec<MountInfo> {
        let fresh = self.source.mounts();
        *self.table.borrow_mut() = Some((Instant::now(), fresh.clone()));
        fresh
    }

    fn probe_ready(&self, root: &Path) -> bool {
        self.source.probe_ready(root)
    }
}

impl<S: MountSource> VolumeProbe for CachedMounts<S> {
    fn is_removable(&self, path: &Path) -> bool {
        let mut table = self.table.borrow_mut();
        let stale = match table.as_ref() {
            Some((read_at, _)) => read_at.elapsed() >= self.max_age,
            None => true,
        };
        if stale {
            tracing::debug!("Re-reading mount table");
            *table = Some((Instant::now(), self.source.mounts()));
        }
        table
            .as_ref()
            .and_then(|(_, mounts)| mount_for(mounts, path))
            .is_some_and(|m| m.removable)
    }
}

impl<T: MountSource + ?Sized> MountSource for Rc<T> {
    fn mounts(&self) -> Vec<MountInfo> {
        (**self).mounts()
    }

    fn probe_ready(&self, root: &Path) -> bool {
        (**self).probe_ready(root)
    }
}

impl<T: VolumeProbe + ?Sized> VolumeProbe for Rc<T> {
    fn is_removable(&self, path: &Path) -> bool {
        (**self).is_removable(path)
    }
}

#[cfg(windows)]
fn enumerate_mounts() -> Vec<MountInfo> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let mut entries: Vec<MountInfo> = disks
        .iter()
        .map(|d| {
            let root = d.mount_point().to_path_buf();
            MountInfo {
                label: root.to_string_lossy().to_string(),
                root,
                removable: d.is_removable(),
                total_bytes: d.total_space(),
                available_bytes: d.available_space(),
            }
        })
        .collect();

    if entries.is_empty() {
        entries.push(MountInfo {
            root: PathBuf::from("C:\\"),
            label: "C:\\".to_string(),
            removable: false,
            total_bytes: 0,
            available_bytes: 0,
        });
    }
    entries
}

#[cfg(not(windows))]
fn enumerate_mounts() -> Vec<MountInfo> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let mut entries: Vec<MountInfo> = disks
        .iter()
        .filter_map(|d| {
            let root = d.mount_point().to_path_buf();
            if !root.is_absolute() {
                return None;
            }
            Some(MountInfo {
                label: root.to_string_lossy().to_string(),
                root,
                removable: d.is_removable(),
                total_bytes: d.total_space(),
                available_bytes: d.available_space(),
            })
        })
        .collect();

    if entries.is_empty() {
        entries.push(MountInfo {
            root: PathBuf::from("/"),
            label: "/".to_string(),
            removable: false,
            total_bytes: 0,
            available_bytes: 0,
        });
    }
    entries
}

/// Process-lifetime memo of drives that have shown probe latency.
///
/// Once a drive is marked slow it stays slow; it is listed but never probed again.
#[derive(Debug, Clone)]
pub struct DriveContext {
    slow: HashSet<String>,
    threshold: Duration,
}

impl DriveContext {
    pub fn new(threshold: Duration) -> Self {
        Self { slow: HashSet::new(), threshold }
    }

    fn key(root: &Path) -> String {
        root.to_string_lossy().to_lowercase()
    }

    pub fn is_slow(&self, root: &Path) -> bool {
        self.slow.contains(&Self::key(root))
    }

    pub fn mark_slow(&mut self, root: &Path) {
        if self.slow.insert(Self::key(root)) {
            tracing::info!("Marking {} as a slow drive", root.display());
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }
}

#[derive(Debug, Clone)]
pub struct DriveEntry {
    pub root: PathBuf,
    pub label: String,
    pub removable: bool,
    /// Not probed this time because the drive is known to be slow
    pub slow: bool,
    pub ready: bool,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Drive list, rebuilt from the mount table on every activation and never persisted.
#[derive(Debug, Clone, Default)]
pub struct Drives {
    entries: Vec<DriveEntry>,
}

impl Drives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DriveEntry] {
        &self.entries
    }

    pub fn refresh(&mut self, source: &dyn MountSource, ctx: &mut DriveContext) {
        let mut entries: Vec<DriveEntry> = source
            .mounts()
            .into_iter()
            .map(|mount| {
                let slow = ctx.is_slow(&mount.root);
                let ready = if slow {
                    false
                } else if mount.removable {
                    let start = Instant::now();
                    let ready = source.probe_ready(&mount.root);
                    if start.elapsed() > ctx.threshold() {
                        ctx.mark_slow(&mount.root);
                    }
                    ready
                } else {
                    true
                };
                DriveEntry {
                    root: mount.root,
                    label: mount.label,
                    removable: mount.removable,
                    slow,
                    ready,
                    total_bytes: mount.total_bytes,
                    available_bytes: mount.available_bytes,
                }
            })
            .collect();

        entries.sort_by(|a, b| a.root.to_string_lossy().to_lowercase().cmp(&b.root.to_string_lossy().to_lowercase()));
        tracing::debug!("Drive list refreshed: {} drives", entries.len());
        self.entries = entries;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct FakeMounts {
        mounts: Vec<MountInfo>,
        probe_delay: Duration,
        probes: Cell<usize>,
    }

    fn mount(root: &str, removable: bool) -> MountInfo {
        MountInfo {
            root: PathBuf::from(root),
            label: root.to_string(),
            removable,
            total_bytes: 0,
            available_bytes: 0,
        }
    }

    struct CountingMounts {
        mounts: Vec<MountInfo>,
        reads: Cell<usize>,
    }

    impl MountSource for CountingMounts {
        fn mounts(&self) -> Vec<MountInfo> {
            self.reads.set(self.reads.get() + 1);
            self.mounts.clone()
        }
    }

    impl MountSource for FakeMounts {
        fn mounts(&self) -> Vec<MountInfo> {
            self.mounts.clone()
        }

        fn probe_ready(&self, _root: &Path) -> bool {
            self.probes.set(self.probes.get() + 1);
            std::thread::sleep(self.probe_delay);
            true
        }
    }

    #[test]
    fn drives_are_listed_in_letter_order() {
        let source = FakeMounts {
            mounts: vec![mount("D:\\", false), mount("C:\\", false), mount("E:\\", true)],
            probe_delay: Duration::ZERO,
            probes: Cell::new(0),
        };
        let mut ctx = DriveContext::new(Duration::from_secs(5));
        let mut drives = Drives::new();
        drives.refresh(&source, &mut ctx);
        let roots: Vec<_> = drives.entries().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(roots, ["C:\\", "D:\\", "E:\\"]);
        // only the removable drive is probed
        assert_eq!(source.probes.get(), 1);
    }

    #[test]
    fn slow_removable_drive_is_never_probed_again() {
        let source = FakeMounts {
            mounts: vec![mount("E:\\", true)],
            probe_delay: Duration::from_millis(30),
            probes: Cell::new(0),
        };
        let mut ctx = DriveContext::new(Duration::from_millis(5));
        let mut drives = Drives::new();

        drives.refresh(&source, &mut ctx);
        assert!(ctx.is_slow(Path::new("e:\\")));
        assert_eq!(source.probes.get(), 1);

        drives.refresh(&source, &mut ctx);
        drives.refresh(&source, &mut ctx);
        assert_eq!(source.probes.get(), 1);
        assert!(drives.entries()[0].slow);
        assert!(!drives.entries()[0].ready);
    }

    #[test]
    fn mount_lookup_prefers_drive_letter_then_longest_prefix() {
        let mounts = vec![mount("/", false), mount("/media/usb", true), mount("E:\\", true)];
        assert!(mount_for(&mounts, Path::new("/media/usb/photos")).unwrap().removable);
        assert!(!mount_for(&mounts, Path::new("/home/me")).unwrap().removable);
        assert_eq!(mount_for(&mounts, Path::new("e:\\foo")).unwrap().label, "E:\\");
        assert!(mount_for(&mounts, Path::new("F:\\foo")).is_none());
    }

    #[test]
    fn removable_checks_reuse_the_last_mount_table() {
        let source = CountingMounts { mounts: vec![mount("/", false), mount("/media/usb", true)], reads: Cell::new(0) };
        let cached = CachedMounts::new(source, Duration::from_secs(3600));

        assert!(cached.is_removable(Path::new("/media/usb/photos")));
        assert!(!cached.is_removable(Path::new("/home/me")));
        assert_eq!(cached.source.reads.get(), 1);

        // a drive listing refreshes the kept table
        assert_eq!(cached.mounts().len(), 2);
        assert!(cached.is_removable(Path::new("/media/usb")));
        assert_eq!(cached.source.reads.get(), 2);
    }

    #[test]
    fn expired_mount_table_is_read_again() {
        let source = CountingMounts { mounts: vec![mount("E:\\", true)], reads: Cell::new(0) };
        let cached = CachedMounts::new(source, Duration::ZERO);
        assert!(cached.is_removable(Path::new("E:\\docs")));
        assert!(cached.is_removable(Path::new("E:\\docs")));
        assert_eq!(cached.source.reads.get(), 2);
    }

    #[test]
    fn shared_table_serves_both_seams() {
        let cached = Rc::new(CachedMounts::new(
            CountingMounts { mounts: vec![mount("/", false)], reads: Cell::new(0) },
            Duration::from_secs(3600),
        ));
        let listing: Box<dyn MountSource> = Box::new(Rc::clone(&cached));
        let probe: Box<dyn VolumeProbe> = Box::new(Rc::clone(&cached));
        listing.mounts();
        assert!(!probe.is_removable(Path::new("/srv")));
        assert_eq!(cached.source.reads.get(), 1);
    }
}
