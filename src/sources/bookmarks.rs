use std::path::{Path, PathBuf};

/// User-curated, reorderable list of paths.
#[derive(Debug, Clone)]
pub struct Bookmarks {
    entries: Vec<PathBuf>,
    max: usize,
}

impl Bookmarks {
    pub fn new(max: usize) -> Self {
        Self { entries: Vec::new(), max }
    }

    pub fn with_entries(entries: Vec<PathBuf>, max: usize) -> Self {
        let mut bookmarks = Self::new(max);
        bookmarks.entries = entries;
        bookmarks.entries.truncate(max);
        bookmarks
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Append `path`. Refused once the list is full.
    pub fn add(&mut self, path: impl AsRef<Path>) -> bool {
        if self.entries.len() >= self.max {
            tracing::warn!("Bookmark list full ({} entries), not adding {}", self.max, path.as_ref().display());
            return false;
        }
        self.entries.push(path.as_ref().to_path_buf());
        true
    }

    /// Remove the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<PathBuf> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Move the entry at `drag` to position `drop`, shifting the ones in between.
    pub fn arrange(&mut self, drag: usize, drop: usize) -> bool {
        let len = self.entries.len();
        if drag >= len || drop >= len {
            return false;
        }
        if drag != drop {
            let entry = self.entries.remove(drag);
            self.entries.insert(drop, entry);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(paths: &[&str]) -> Bookmarks {
        Bookmarks::with_entries(paths.iter().map(PathBuf::from).collect(), 10)
    }

    fn strs(bookmarks: &Bookmarks) -> Vec<String> {
        bookmarks.entries().iter().map(|p| p.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn arrange_moves_entry_and_shifts_others() {
        let mut bookmarks = list(&["A", "B", "C", "D"]);
        assert!(bookmarks.arrange(2, 0));
        assert_eq!(strs(&bookmarks), ["C", "A", "B", "D"]);

        assert!(bookmarks.arrange(0, 3));
        assert_eq!(strs(&bookmarks), ["A", "B", "D", "C"]);
    }

    #[test]
    fn arrange_rejects_out_of_bounds() {
        let mut bookmarks = list(&["A", "B"]);
        assert!(!bookmarks.arrange(2, 0));
        assert!(!bookmarks.arrange(0, 2));
        assert_eq!(strs(&bookmarks), ["A", "B"]);
    }

    #[test]
    fn add_appends_until_full() {
        let mut bookmarks = Bookmarks::new(2);
        assert!(bookmarks.add("C:\\A"));
        assert!(bookmarks.add("C:\\B"));
        assert!(!bookmarks.add("C:\\C"));
        assert_eq!(strs(&bookmarks), ["C:\\A", "C:\\B"]);
    }

    #[test]
    fn remove_by_index() {
        let mut bookmarks = list(&["A", "B", "C"]);
        assert_eq!(bookmarks.remove(1), Some(PathBuf::from("B")));
        assert_eq!(bookmarks.remove(5), None);
        assert_eq!(strs(&bookmarks), ["A", "C"]);
    }
}
