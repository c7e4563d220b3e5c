//! Deadline-bounded size calculation for folders and working sets.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;

/// Byte total, flagged incomplete when the walk ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeEstimate {
    pub bytes: u64,
    pub complete: bool,
}

impl SizeEstimate {
    fn merge(self, other: SizeEstimate) -> SizeEstimate {
        SizeEstimate { bytes: self.bytes + other.bytes, complete: self.complete && other.complete }
    }
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complete {
            f.write_str(&format_size(self.bytes))
        } else {
            write!(f, "more than {}", format_size(self.bytes))
        }
    }
}

/// Human-readable size: whole bytes, one decimal for KB, two above that.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let decimals = if unit == 0 { 1 } else { 2 };
    format!("{:.*} {}", decimals, value, UNITS[unit])
}

/// Total size of the files under `path`, stopping once `deadline` passes.
///
/// A plain file counts as itself. An entry that cannot be read leaves the
/// estimate incomplete, as does running past the deadline.
///
/// The walk runs serially: `total_size` already spreads a working set over
/// the rayon pool, and a nested jwalk walk would share that pool.
pub fn directory_size(path: &Path, deadline: Instant) -> SizeEstimate {
    if !path.is_dir() {
        return match std::fs::metadata(path) {
            Ok(meta) => SizeEstimate { bytes: meta.len(), complete: true },
            Err(e) => {
                tracing::debug!("Cannot size {}: {}", path.display(), e);
                SizeEstimate { bytes: 0, complete: false }
            }
        };
    }

    let mut estimate = SizeEstimate { bytes: 0, complete: true };
    let walk = WalkDir::new(path).skip_hidden(false).follow_links(false).parallelism(Parallelism::Serial);
    for entry in walk {
        if Instant::now() >= deadline {
            tracing::debug!("Size of {} timed out at {} bytes", path.display(), estimate.bytes);
            return SizeEstimate { bytes: estimate.bytes, complete: false };
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Size walk under {}: {}", path.display(), e);
                estimate.complete = false;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => estimate.bytes += meta.len(),
            Err(e) => {
                tracing::debug!("Cannot size {}: {}", entry.path().display(), e);
                estimate.complete = false;
            }
        }
    }
    estimate
}

/// Sum of `directory_size` over a working set, walked in parallel.
pub fn total_size(paths: &[PathBuf], deadline: Instant) -> SizeEstimate {
    paths
        .par_iter()
        .map(|path| directory_size(path, deadline))
        .reduce(|| SizeEstimate { bytes: 0, complete: true }, SizeEstimate::merge)
}
