use academy_core::{CatalogRow, SelectionTracker, TableId};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::TableData;

use super::theme::Theme;

const CHECK_WIDTH: u16 = 4;
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const GAP: u16 = 1;

/// A column: title and fixed width, or `None` to take the remaining space
struct Column {
    title: &'static str,
    width: Option<u16>,
}

const fn col(title: &'static str, width: Option<u16>) -> Column {
    Column { title, width }
}

fn columns(table: TableId) -> &'static [Column] {
    const LESSONS: [Column; 5] = [
        col("Title", None),
        col("Date", Some(12)),
        col("Series", Some(22)),
        col("School", Some(16)),
        col("Pub", Some(3)),
    ];
    const SERIES: [Column; 2] = [col("Series", None), col("Lessons", Some(7))];
    const SCHOOLS: [Column; 2] = [col("School", None), col("Lessons", Some(7))];

    match table {
        TableId::Lessons | TableId::Modal => &LESSONS,
        TableId::Series => &SERIES,
        TableId::Schools => &SCHOOLS,
    }
}

/// Resolve column widths for the space right of the checkbox
fn column_widths(table: TableId, width: u16) -> Vec<u16> {
    let cols = columns(table);
    let fixed: u16 = cols.iter().map(|c| c.width.unwrap_or(0) + GAP).sum();
    let flex = width.saturating_sub(CHECK_WIDTH + fixed).max(8);
    cols.iter().map(|c| c.width.unwrap_or(flex)).collect()
}

/// Checkbox cell; rows that cannot be deleted get no checkbox
pub fn checkbox(row: &CatalogRow, checked: bool) -> &'static str {
    if row.delete_blocked() {
        "--"
    } else if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Text of each column for a row, in column order
pub fn row_cells(row: &CatalogRow) -> Vec<String> {
    match row {
        CatalogRow::Lesson(l) => vec![
            l.title.clone(),
            l.date.clone(),
            l.series_label(),
            l.category_name.clone(),
            if l.published { "yes" } else { "no" }.to_string(),
        ],
        CatalogRow::Series(s) => vec![s.series_name.clone(), s.lesson_count.to_string()],
        CatalogRow::School(s) => vec![s.name.clone(), s.lesson_count.to_string()],
    }
}

/// Cut `s` to `width` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// One catalog table with a column header row
pub struct TableView<'a> {
    table: TableId,
    data: &'a TableData,
    tracker: &'a SelectionTracker,
    loading: bool,
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> TableView<'a> {
    pub fn new(
        table: TableId,
        data: &'a TableData,
        tracker: &'a SelectionTracker,
        theme: &'a Theme,
    ) -> Self {
        Self {
            table,
            data,
            tracker,
            loading: false,
            spinner_frame: 0,
            theme,
        }
    }

    pub fn loading(mut self, loading: bool, spinner_frame: usize) -> Self {
        self.loading = loading;
        self.spinner_frame = spinner_frame;
        self
    }

    fn render_centered(&self, area: Rect, buf: &mut Buffer, msg: &str, style: Style) {
        let msg = truncate(msg, area.width.saturating_sub(2) as usize);
        let x = area.x + area.width.saturating_sub(msg.chars().count() as u16) / 2;
        let y = area.y + area.height / 2;
        buf.set_string(x, y, &msg, style);
    }
}

impl Widget for TableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 || area.width < 30 {
            return;
        }

        let widths = column_widths(self.table, area.width);

        // Column titles
        let title_style = Style::default()
            .fg(self.theme.fg_dim)
            .add_modifier(Modifier::BOLD);
        let mut x = area.x + CHECK_WIDTH;
        for (column, width) in columns(self.table).iter().zip(&widths) {
            let title = truncate(column.title, *width as usize);
            buf.set_string(x, area.y, title, title_style);
            x += width + GAP;
        }

        let body = Rect::new(area.x, area.y + 1, area.width, area.height - 1);

        if self.data.rows.is_empty() {
            if self.loading || !self.data.loaded {
                let msg = format!(
                    "{} Loading {}...",
                    SPINNER[self.spinner_frame % SPINNER.len()],
                    self.table.noun()
                );
                self.render_centered(body, buf, &msg, Style::default().fg(self.theme.yellow));
            } else if let Some(err) = &self.data.error {
                self.render_centered(body, buf, err, Style::default().fg(self.theme.red));
            } else {
                let msg = format!("No {} found", self.table.label().to_lowercase());
                self.render_centered(body, buf, &msg, Style::default().fg(self.theme.fg_dim));
            }
            return;
        }

        let view = &self.data.view;
        for (i, row) in self
            .data
            .rows
            .iter()
            .skip(view.scroll_offset)
            .take(body.height as usize)
            .enumerate()
        {
            let y = body.y + i as u16;
            let is_cursor = i + view.scroll_offset == view.selected_index;
            let checked = self.tracker.is_selected(self.table, row.id());
            let row_style = self.theme.row_style(is_cursor, checked);

            // Clear the row
            buf.set_string(body.x, y, " ".repeat(body.width as usize), row_style);

            let box_color = if row.delete_blocked() {
                self.theme.fg_muted
            } else if checked {
                self.theme.purple
            } else {
                self.theme.fg_dim
            };
            buf.set_string(
                body.x,
                y,
                checkbox(row, checked),
                self.theme.accent(row_style, is_cursor, box_color),
            );

            let mut x = body.x + CHECK_WIDTH;
            for (col, (cell, width)) in row_cells(row).iter().zip(&widths).enumerate() {
                // First column is the name; the rest are secondary
                let style = if col == 0 {
                    row_style
                } else {
                    self.theme.accent(row_style, is_cursor, self.theme.fg_dim)
                };
                buf.set_string(x, y, truncate(cell, *width as usize), style);
                x += width + GAP;
            }
        }

        // Scroll hint
        let total = self.data.rows.len();
        if total > body.height as usize {
            let hint = format!(" {}/{} ", view.selected_index + 1, total);
            let hx = area.x + area.width.saturating_sub(hint.len() as u16 + 1);
            buf.set_string(hx, area.y, &hint, Style::default().fg(self.theme.fg_muted));
        }
    }
}
