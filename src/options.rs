use crate::list::sort::SortField;
use crate::prefs::Preferences;

const SECTION: &str = "Option";

/// Extra ordering applied to the History pseudo-folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistorySort {
    pub enabled: bool,
    pub field: SortField,
    pub reverse: bool,
}

/// Sort and visibility settings for the file pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    pub sort_field: SortField,
    pub sort_reverse: bool,
    pub show_hidden: bool,
    pub history_sort: HistorySort,
}

impl DisplayOptions {
    pub fn load(prefs: &dyn Preferences) -> Self {
        Self {
            sort_field: SortField::from_index(prefs.get_int(SECTION, "SortField", 0)),
            sort_reverse: prefs.get_bool(SECTION, "SortReverse", false),
            show_hidden: prefs.get_bool(SECTION, "ShowHidden", false),
            history_sort: HistorySort {
                enabled: prefs.get_bool(SECTION, "HistorySort", false),
                field: SortField::from_index(prefs.get_int(SECTION, "HistorySortField", 0)),
                reverse: prefs.get_bool(SECTION, "HistorySortReverse", false),
            },
        }
    }

    pub fn save(&self, prefs: &mut dyn Preferences) {
        prefs.set_int(SECTION, "SortField", self.sort_field.as_index());
        prefs.set_bool(SECTION, "SortReverse", self.sort_reverse);
        prefs.set_bool(SECTION, "ShowHidden", self.show_hidden);
        prefs.set_bool(SECTION, "HistorySort", self.history_sort.enabled);
        prefs.set_int(SECTION, "HistorySortField", self.history_sort.field.as_index());
        prefs.set_bool(SECTION, "HistorySortReverse", self.history_sort.reverse);
    }
}
