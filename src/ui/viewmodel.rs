//! View model types representing renderable screen state.
//!
//! [`compute_viewmodel`] turns a [`ListSnapshot`] of the list widget into
//! display-ready rows: it windows the rows around the selection so the
//! selected recording is always visible and resolves window properties into
//! header text. View models carry no behavior.

use super::handle::{
    POSTER_PLACEHOLDER, PROP_DATE, PROP_POSTER, PROP_SORT_ASCENDING, PROP_SORT_BY, PROP_TIME,
    PROP_TITLE,
};
use super::list::ListSnapshot;
use crate::storage::settings::parse_bool;

/// Lines used by everything except the rows: blank, header, sort line,
/// border, column headers, border, footer.
pub const CHROME_LINES: usize = 7;

const TITLE_COLUMN_WIDTH: usize = 40;

/// Complete view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenViewModel {
    /// Rows inside the visible window.
    pub display_rows: Vec<DisplayRow>,

    /// Index of the selected row within `display_rows`.
    pub selected_index: usize,

    pub header: HeaderInfo,
    pub footer: FooterInfo,

    /// Set when the list has no rows.
    pub empty_state: Option<EmptyState>,

    /// Most recent error shown to the user.
    pub error: Option<String>,
}

/// One recording row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub title: String,
    pub date: String,
    pub time: String,
    /// `false` while the placeholder poster is still shown.
    pub poster_ready: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// e.g. `Sort: Title (ascending)`.
    pub sort: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Builds the view model for a terminal of `rows` lines.
#[must_use]
pub fn compute_viewmodel(snapshot: &ListSnapshot, rows: usize, error: Option<String>) -> ScreenViewModel {
    let header = compute_header(snapshot);
    let footer = FooterInfo {
        keybindings: "j/k: move | enter: details | r: refresh | s: sort | a: direction | q: back"
            .to_string(),
    };

    let Some(selected) = snapshot.selected else {
        return ScreenViewModel {
            display_rows: Vec::new(),
            selected_index: 0,
            header,
            footer,
            empty_state: Some(EmptyState {
                message: "No recordings".to_string(),
                subtitle: "Press 'r' to refresh".to_string(),
            }),
            error,
        };
    };

    let total = snapshot.rows.len();
    let available_rows = rows.saturating_sub(CHROME_LINES).max(1);

    let mut visible_start = selected.saturating_sub(available_rows / 2);
    let visible_end = (visible_start + available_rows).min(total);
    if visible_end - visible_start < available_rows && total >= available_rows {
        visible_start = visible_end.saturating_sub(available_rows);
    }

    let display_rows = snapshot.rows[visible_start..visible_end]
        .iter()
        .enumerate()
        .map(|(relative_idx, row)| {
            let title = row.property(PROP_TITLE).unwrap_or_default();
            DisplayRow {
                title: truncate(title, TITLE_COLUMN_WIDTH - 2),
                date: row.property(PROP_DATE).unwrap_or_default().to_string(),
                time: row.property(PROP_TIME).unwrap_or_default().to_string(),
                poster_ready: row
                    .property(PROP_POSTER)
                    .is_some_and(|poster| poster != POSTER_PLACEHOLDER),
                is_selected: visible_start + relative_idx == selected,
            }
        })
        .collect();

    ScreenViewModel {
        display_rows,
        selected_index: selected - visible_start,
        header,
        footer,
        empty_state: None,
        error,
    }
}

fn compute_header(snapshot: &ListSnapshot) -> HeaderInfo {
    let sort_by = snapshot.window_property(PROP_SORT_BY).unwrap_or("Date");
    let ascending = snapshot
        .window_property(PROP_SORT_ASCENDING)
        .and_then(parse_bool)
        .unwrap_or(true);
    let direction = if ascending { "ascending" } else { "descending" };

    HeaderInfo {
        title: "Recordings".to_string(),
        sort: format!("Sort: {sort_by} ({direction})"),
    }
}

/// Truncates on character boundaries, marking the cut with `...`.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Width of the title column, including its trailing gap.
#[must_use]
pub const fn title_column_width() -> usize {
    TITLE_COLUMN_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::handle::{RowHandle, UiHandle};
    use crate::ui::MemoryList;

    fn list_with(count: u64) -> MemoryList {
        let list = MemoryList::new();
        let rows: Vec<_> = (1..=count).map(RowHandle::new).collect();
        for row in &rows {
            list.set_row_property(*row, PROP_TITLE, &format!("Show {}", row.id()));
            list.set_row_property(*row, PROP_POSTER, POSTER_PLACEHOLDER);
        }
        list.add_rows(&rows);
        list
    }

    #[test]
    fn empty_list_shows_empty_state() {
        let vm = compute_viewmodel(&MemoryList::new().snapshot(), 24, None);
        assert!(vm.display_rows.is_empty());
        assert!(vm.empty_state.is_some());
        assert_eq!(vm.header.sort, "Sort: Date (ascending)");
    }

    #[test]
    fn window_keeps_selection_visible() {
        let list = list_with(50);
        list.select(40);
        let vm = compute_viewmodel(&list.snapshot(), CHROME_LINES + 10, None);

        assert_eq!(vm.display_rows.len(), 10);
        let selected = &vm.display_rows[vm.selected_index];
        assert!(selected.is_selected);
        assert_eq!(selected.title, "Show 41");
    }

    #[test]
    fn window_is_full_at_the_end_of_the_list() {
        let list = list_with(20);
        list.select(19);
        let vm = compute_viewmodel(&list.snapshot(), CHROME_LINES + 8, None);

        assert_eq!(vm.display_rows.len(), 8);
        assert_eq!(vm.selected_index, 7);
        assert_eq!(vm.display_rows[0].title, "Show 13");
    }

    #[test]
    fn filled_posters_are_marked_ready() {
        let list = list_with(2);
        list.set_row_property(RowHandle::new(2), PROP_POSTER, "/tmp/2.png");
        list.set_window_property(PROP_SORT_BY, "Title");
        list.set_window_property(PROP_SORT_ASCENDING, "false");

        let vm = compute_viewmodel(&list.snapshot(), 24, None);
        let ready: Vec<_> = vm.display_rows.iter().map(|row| row.poster_ready).collect();
        assert_eq!(ready, vec![false, true]);
        assert_eq!(vm.header.sort, "Sort: Title (descending)");
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "x".repeat(100);
        let cut = truncate(&long, 10);
        assert_eq!(cut, "xxxxxxx...");
        assert_eq!(truncate("short", 10), "short");
    }
}
