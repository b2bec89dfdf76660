use crate::dates::pretty_date;
use crate::models::{CellView, Document, GridView, HeaderCell, RowView};

pub const ROW_HEIGHT: u32 = 56;
pub const INITIAL_VISIBLE_PAST_DAYS: u32 = 3;
pub const CHECK_GLYPH: &str = "✓";

/// Builds the view model for `window` (oldest first). The fade is computed
/// from each row's slot in the window, not from a calendar difference with
/// `today`.
pub fn build_grid(document: &Document, window: &[String], today: &str) -> GridView {
    let rows: Vec<RowView> = window
        .iter()
        .enumerate()
        .map(|(index, date)| {
            let days_before_today = window.len().saturating_sub(1 + index);
            let cells = document
                .tasks
                .iter()
                .map(|task| {
                    let checked = document.is_checked(date, &task.id);
                    CellView {
                        task_id: task.id.clone(),
                        task_name: task.name.clone(),
                        checked,
                        text: if checked { CHECK_GLYPH } else { "" },
                    }
                })
                .collect();

            RowView {
                date: date.clone(),
                label: pretty_date(date),
                mutable: date == today,
                opacity: row_opacity(days_before_today),
                cells,
            }
        })
        .collect();

    let footer = document
        .tasks
        .iter()
        .map(|task| HeaderCell {
            task_id: task.id.clone(),
            name: task.name.clone(),
            emoji: task.emoji.clone(),
        })
        .collect();

    // rows plus the footer row of glyphs
    let content_height = (rows.len() as u32 + 1) * ROW_HEIGHT;

    GridView {
        today: today.to_string(),
        rows,
        footer,
        scroll_top: initial_scroll_offset(content_height, ROW_HEIGHT, INITIAL_VISIBLE_PAST_DAYS),
    }
}

pub fn row_opacity(days_before_today: usize) -> f64 {
    match days_before_today {
        0 => 1.0,
        1 => 0.8,
        2 => 0.5,
        3 => 0.2,
        _ => 0.0,
    }
}

pub fn initial_scroll_offset(content_height: u32, row_height: u32, visible_past_days: u32) -> u32 {
    content_height.saturating_sub(row_height * (visible_past_days + 1))
}
