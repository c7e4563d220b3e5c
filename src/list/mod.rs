pub mod item;
pub mod sort;

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

use self::item::FileItem;
use self::sort::SortField;

/// Ordered rows of one pane plus the selection count.
///
/// The order only changes through `sort`, `add` and `insert_at`.
/// `selected_count` always equals the number of selected rows; structural rows
/// (separators, the empty placeholder) are never selected.
#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    items: Vec<FileItem>,
    selected_count: usize,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mut item: FileItem) {
        self.normalize(&mut item);
        self.items.push(item);
    }

    pub fn insert_at(&mut self, index: usize, mut item: FileItem) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::IndexOutOfRange { index, len: self.items.len() });
        }
        self.normalize(&mut item);
        self.items.insert(index, item);
        Ok(())
    }

    /// Keep the count honest for rows that arrive already selected.
    fn normalize(&mut self, item: &mut FileItem) {
        if !item.is_selectable() {
            item.selected = false;
        } else if item.selected {
            self.selected_count += 1;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected_count = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&FileItem> {
        self.items.get(index).ok_or(Error::IndexOutOfRange { index, len: self.items.len() })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[FileItem] {
        &self.items
    }

    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    /// Indices of selected rows in pane order.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().enumerate().filter(|(_, item)| item.selected).map(|(i, _)| i)
    }

    /// Stable sort: folders before files, `reverse` flips the order inside each group.
    pub fn sort(&mut self, field: SortField, reverse: bool) {
        self.items.sort_by(|a, b| sort::compare(a, b, field, reverse));
    }

    fn checked_range(&self, front: usize, back: usize) -> Result<RangeInclusive<usize>> {
        let len = self.items.len();
        for index in [front, back] {
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
        }
        Ok(front.min(back)..=front.max(back))
    }

    /// Select over the inclusive range between `front` and `back`.
    ///
    /// With `all` every selectable row in the range ends up selected; without it
    /// each selectable row is toggled on its own.
    pub fn select(&mut self, front: usize, back: usize, all: bool) -> Result<()> {
        let range = self.checked_range(front, back)?;
        for item in &mut self.items[range] {
            if !item.is_selectable() {
                continue;
            }
            if all {
                if !item.selected {
                    item.selected = true;
                    self.selected_count += 1;
                }
            } else if item.selected {
                item.selected = false;
                self.selected_count -= 1;
            } else {
                item.selected = true;
                self.selected_count += 1;
            }
        }
        Ok(())
    }

    pub fn unselect(&mut self) {
        for item in &mut self.items {
            item.selected = false;
        }
        self.selected_count = 0;
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a FileItem;
    type IntoIter = std::slice::Iter<'a, FileItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::item::{FileItem, ItemAttrs, SeparatorKind};
    use super::*;

    fn file(name: &str, size: u64, secs: u64) -> FileItem {
        let mut item = FileItem::entry(format!("/data/{name}"), ItemAttrs::empty());
        item.size = size;
        item.last_write_time = Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
        item
    }

    fn dir(name: &str, secs: u64) -> FileItem {
        let mut item = FileItem::entry(format!("/data/{name}"), ItemAttrs::DIRECTORY);
        item.last_write_time = Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
        item
    }

    fn names(list: &ItemCollection) -> Vec<String> {
        list.iter().map(|i| i.display_name.to_string()).collect()
    }

    fn sample() -> ItemCollection {
        let mut list = ItemCollection::new();
        list.add(file("b.txt", 30, 3));
        list.add(dir("zeta", 9));
        list.add(file("a.rs", 10, 1));
        list.add(dir("alpha", 8));
        list.add(file("c.md", 20, 2));
        list
    }

    #[test]
    fn folders_precede_files_for_every_field_and_direction() {
        for field in SortField::ALL {
            for reverse in [false, true] {
                let mut list = sample();
                list.sort(field, reverse);
                let dirs: Vec<bool> = list.iter().map(|i| i.is_directory()).collect();
                assert_eq!(dirs, vec![true, true, false, false, false], "{field:?} reverse={reverse}");
            }
        }
    }

    #[test]
    fn reverse_flips_order_within_groups() {
        for field in SortField::ALL {
            let mut forward = sample();
            forward.sort(field, false);
            let mut backward = sample();
            backward.sort(field, true);

            let f = names(&forward);
            let b = names(&backward);
            let mut expected_dirs: Vec<_> = f[..2].to_vec();
            expected_dirs.reverse();
            let mut expected_files: Vec<_> = f[2..].to_vec();
            expected_files.reverse();
            assert_eq!(b[..2], expected_dirs[..], "{field:?}");
            assert_eq!(b[2..], expected_files[..], "{field:?}");
        }
    }

    #[test]
    fn sort_by_field() {
        let mut list = sample();
        list.sort(SortField::Name, false);
        assert_eq!(names(&list), ["alpha", "zeta", "a.rs", "b.txt", "c.md"]);
        list.sort(SortField::Type, false);
        assert_eq!(names(&list), ["alpha", "zeta", "c.md", "a.rs", "b.txt"]);
        list.sort(SortField::Date, false);
        assert_eq!(names(&list), ["alpha", "zeta", "a.rs", "c.md", "b.txt"]);
        list.sort(SortField::Size, true);
        assert_eq!(names(&list), ["zeta", "alpha", "b.txt", "c.md", "a.rs"]);
    }

    #[test]
    fn equal_sizes_fall_back_to_name() {
        let mut list = ItemCollection::new();
        list.add(file("pear", 5, 0));
        list.add(file("apple", 5, 0));
        list.add(file("fig", 1, 0));
        list.sort(SortField::Size, false);
        assert_eq!(names(&list), ["fig", "apple", "pear"]);
    }

    #[test]
    fn equal_dates_keep_prior_order() {
        let mut list = ItemCollection::new();
        list.add(file("second", 0, 7));
        list.add(file("first", 0, 7));
        list.sort(SortField::Date, false);
        assert_eq!(names(&list), ["second", "first"]);
    }

    #[test]
    fn selection_count_tracks_toggles_and_skips_separators() {
        let mut list = ItemCollection::new();
        list.add(file("a", 0, 0));
        list.add(FileItem::separator(SeparatorKind::Hierarchy));
        list.add(file("b", 0, 0));
        list.add(file("c", 0, 0));

        list.select(0, 2, false).unwrap();
        assert_eq!(list.selected_count(), 2);
        assert!(!list.get(1).unwrap().selected);

        list.select(2, 3, false).unwrap();
        assert_eq!(list.selected_count(), 2);
        assert_eq!(list.selected_indices().collect::<Vec<_>>(), vec![0, 3]);

        list.select(3, 0, true).unwrap();
        assert_eq!(list.selected_count(), 3);
        let actual = list.iter().filter(|i| i.selected).count();
        assert_eq!(actual, list.selected_count());

        list.unselect();
        assert_eq!(list.selected_count(), 0);
        assert_eq!(list.selected_indices().count(), 0);
    }

    #[test]
    fn empty_placeholder_is_skipped_by_select() {
        let mut list = ItemCollection::new();
        list.add(FileItem::empty_placeholder());
        list.select(0, 0, false).unwrap();
        list.select(0, 0, true).unwrap();
        assert_eq!(list.selected_count(), 0);
        assert!(!list.get(0).unwrap().selected);
    }

    #[test]
    fn bad_indices_are_reported() {
        let mut list = sample();
        assert!(matches!(list.get(5), Err(Error::IndexOutOfRange { index: 5, len: 5 })));
        assert!(list.select(0, 9, false).is_err());
        assert!(list.insert_at(6, dir("x", 0)).is_err());
        assert_eq!(list.selected_count(), 0);
    }

    #[test]
    fn insert_at_places_row() {
        let mut list = sample();
        list.insert_at(0, dir("first", 0)).unwrap();
        assert_eq!(list.get(0).unwrap().display_name, "first");
        assert_eq!(list.len(), 6);
    }
}
