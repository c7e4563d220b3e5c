use std::cmp::Ordering;
use std::time::SystemTime;

use super::item::FileItem;

/// Column a pane is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Type,
    Date,
    Size,
}

impl SortField {
    pub const ALL: [SortField; 4] = [SortField::Name, SortField::Type, SortField::Date, SortField::Size];

    /// Stored form used in preferences.
    pub fn as_index(self) -> i64 {
        match self {
            SortField::Name => 0,
            SortField::Type => 1,
            SortField::Date => 2,
            SortField::Size => 3,
        }
    }

    /// Unknown values fall back to `Name`.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => SortField::Type,
            2 => SortField::Date,
            3 => SortField::Size,
            _ => SortField::Name,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Type => "Type",
            SortField::Date => "Date",
            SortField::Size => "Size",
        }
    }
}

/// Full ordering used by `ItemCollection::sort`: folders first, then the
/// field comparison, flipped by `reverse` inside each group only.
pub fn compare(a: &FileItem, b: &FileItem, field: SortField, reverse: bool) -> Ordering {
    match (a.is_directory(), b.is_directory()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }
    let ord = compare_field(a, b, field);
    if reverse {
        ord.reverse()
    } else {
        ord
    }
}

fn compare_field(a: &FileItem, b: &FileItem, field: SortField) -> Ordering {
    match field {
        SortField::Name => cmp_name(a, b),
        SortField::Type => cmp_type(a, b).then_with(|| cmp_name(a, b)),
        SortField::Date => cmp_date(a, b),
        SortField::Size => cmp_size(a, b).then_with(|| cmp_name(a, b)),
    }
}

/// Case folds first, then falls back to exact text so the order is total.
pub fn cmp_name(a: &FileItem, b: &FileItem) -> Ordering {
    let (x, y) = (a.display_name.as_str(), b.display_name.as_str());
    x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(y))
}

pub fn cmp_type(a: &FileItem, b: &FileItem) -> Ordering {
    a.extension().cmp(&b.extension())
}

pub fn cmp_date(a: &FileItem, b: &FileItem) -> Ordering {
    let a_time = a.last_write_time.unwrap_or(SystemTime::UNIX_EPOCH);
    let b_time = b.last_write_time.unwrap_or(SystemTime::UNIX_EPOCH);
    a_time.cmp(&b_time)
}

pub fn cmp_size(a: &FileItem, b: &FileItem) -> Ordering {
    a.size.cmp(&b.size)
}
