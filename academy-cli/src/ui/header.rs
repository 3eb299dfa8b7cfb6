use academy_core::TableId;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::AppState;

use super::theme::Theme;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Right-hand status text: loads and deletes in progress, then checked rows
pub fn status_text(state: &AppState) -> String {
    let mut parts = Vec::new();
    let deleting = state.coordinator.in_flight_tables();
    if !deleting.is_empty() {
        let names: Vec<&str> = deleting.iter().map(|t| t.label()).collect();
        parts.push(format!("deleting in {}", names.join(", ")));
    }
    if state.loader.any_loading() {
        parts.push("loading".to_string());
    }
    let checked = state.tracker.len();
    if checked > 0 {
        parts.push(format!("{} checked", checked));
    }
    let text = parts.join(" · ");
    if !deleting.is_empty() || state.loader.any_loading() {
        format!("{} {}", SPINNER[state.spinner_frame % SPINNER.len()], text)
    } else {
        text
    }
}

/// Header widget showing title, table tabs and status
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let title_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, "ACADEMY", title_style);
        buf.set_string(
            area.x + 9,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        let mut x = area.x + 11;
        for table in TableId::TABS {
            let count = self.state.tracker.count_in(table);
            let label = if count > 0 {
                format!(" {} ({}) ", table.label(), count)
            } else {
                format!(" {} ", table.label())
            };
            let style = if table == self.state.tab {
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.fg_dim)
            };
            buf.set_string(x, area.y, &label, style);
            x += label.chars().count() as u16 + 1;
        }

        let status = status_text(self.state);
        let status_len = status.chars().count() as u16;
        if status_len > 0 && x + status_len + 2 <= area.x + area.width {
            let busy = self.state.coordinator.is_busy() || self.state.loader.any_loading();
            let status_style = if busy {
                Style::default().fg(self.theme.yellow)
            } else {
                Style::default().fg(self.theme.fg_dim)
            };
            buf.set_string(
                area.x + area.width - status_len - 1,
                area.y,
                &status,
                status_style,
            );
        }
    }
}
