//! ANSI rendering of the recordings screen.
//!
//! Layout:
//!
//! ```text
//! [blank line]
//! [Header]
//! [Sort line]
//! [Border]
//! [Column headers]
//! [Rows]
//! [Error line or padding]
//! [Border]
//! [Footer]
//! ```
//!
//! Frames are built into a `String` so the binary can write them in one go
//! and tests can inspect them.

use super::theme::Theme;
use super::viewmodel::{title_column_width, DisplayRow, EmptyState, FooterInfo, HeaderInfo, ScreenViewModel};
use std::fmt::Write;

const DATE_COLUMN_WIDTH: usize = 12;
const TIME_COLUMN_WIDTH: usize = 10;

/// Clears the terminal and renders one frame.
#[must_use]
pub fn render_frame(vm: &ScreenViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut out = String::from("\u{1b}[2J");

    let mut current_row = 2;
    current_row = render_header(&mut out, current_row, &vm.header, theme, cols);
    current_row = render_border(&mut out, current_row, &theme.colors.border, cols);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(&mut out, current_row + 2, empty, theme, cols);
    } else {
        let first_row = render_table_headers(&mut out, current_row, theme);
        let _rows_end = vm
            .display_rows
            .iter()
            .fold(first_row, |row, item| render_table_row(&mut out, row, item, theme, cols));
    }

    let footer_row = rows.saturating_sub(1).max(1);
    let border_row = footer_row.saturating_sub(1).max(1);
    if let Some(error) = &vm.error {
        position_cursor(&mut out, border_row.saturating_sub(1).max(1), 1);
        let _ = write!(out, "{}{}{}", Theme::fg(&theme.colors.error_fg), clip(error, cols), Theme::reset());
    }
    render_border(&mut out, border_row, &theme.colors.border, cols);
    render_footer(&mut out, footer_row, &vm.footer, theme, cols);
    out
}

fn position_cursor(out: &mut String, row: usize, col: usize) {
    let _ = write!(out, "\u{1b}[{row};{col}H");
}

fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    let _ = write!(out, "{}{}{}", Theme::fg(color), "─".repeat(cols), Theme::reset());
    row + 1
}

fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title_len = header.title.chars().count();
    let padding = cols.saturating_sub(title_len) / 2;

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        out.push_str(&Theme::bg(bg));
    }
    let _ = write!(
        out,
        "{}{}{}{}",
        " ".repeat(padding),
        header.title,
        " ".repeat(cols.saturating_sub(padding + title_len)),
        Theme::reset()
    );

    position_cursor(out, row + 1, 1);
    let _ = write!(out, "{}{}{}", Theme::fg(&theme.colors.text_dim), clip(&header.sort, cols), Theme::reset());
    row + 2
}

fn render_table_headers(out: &mut String, row: usize, theme: &Theme) -> usize {
    position_cursor(out, row, 1);
    let _ = write!(
        out,
        "{}{}  {:<title$}{:<date$}{:<time$}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        "TITLE",
        "AIRED",
        "TIME",
        Theme::reset(),
        title = title_column_width(),
        date = DATE_COLUMN_WIDTH,
        time = TIME_COLUMN_WIDTH,
    );
    row + 1
}

/// One row: poster marker, title, air date, start time, padded to the full
/// width so the selection background covers the line.
fn render_table_row(out: &mut String, row: usize, item: &DisplayRow, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);

    let base = if item.is_selected {
        format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    let marker_color = if item.poster_ready {
        &theme.colors.poster_ready_fg
    } else {
        &theme.colors.poster_pending_fg
    };

    out.push_str(&base);
    if !item.is_selected {
        out.push_str(&Theme::fg(marker_color));
    }
    out.push_str(if item.poster_ready { "■ " } else { "□ " });
    out.push_str(&base);

    let line = format!(
        "{:<title$}{:<date$}{:<time$}",
        item.title,
        item.date,
        item.time,
        title = title_column_width(),
        date = DATE_COLUMN_WIDTH,
        time = TIME_COLUMN_WIDTH,
    );
    let line_len = 2 + line.chars().count();
    let _ = write!(out, "{line}{}{}", " ".repeat(cols.saturating_sub(line_len)), Theme::reset());
    row + 1
}

fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) {
    let help_text = clip(&footer.keybindings, cols);
    let text_len = help_text.chars().count();
    let padding = cols.saturating_sub(text_len) / 2;

    position_cursor(out, row, 1);
    let _ = write!(
        out,
        "{}{}{help_text}{}{}",
        Theme::fg(&theme.colors.text_dim),
        " ".repeat(padding),
        " ".repeat(cols.saturating_sub(padding + text_len)),
        Theme::reset()
    );
}

fn render_empty_state(out: &mut String, row: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    for (offset, (text, color, dim)) in [
        (&empty.message, &theme.colors.empty_state_fg, false),
        (&empty.subtitle, &theme.colors.text_dim, true),
    ]
    .into_iter()
    .enumerate()
    {
        let len = text.chars().count();
        let padding = cols.saturating_sub(len) / 2;
        position_cursor(out, row + offset, 1);
        if dim {
            out.push_str(Theme::dim());
        }
        let _ = write!(out, "{}{}{text}{}", Theme::fg(color), " ".repeat(padding), Theme::reset());
    }
}

fn clip(text: &str, cols: usize) -> String {
    text.chars().take(cols).collect()
}
