use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, SessionStats};

use super::theme::Theme;

/// Keyboard hints for a mode
fn hints(mode: AppMode, modal_open: bool) -> Vec<(&'static str, &'static str)> {
    match mode {
        AppMode::Browsing if modal_open => vec![
            ("↑↓", "Navigate"),
            ("Space", "Check"),
            ("d", "Delete"),
            ("Esc", "Close"),
        ],
        AppMode::Browsing => vec![
            ("Tab", "Tables"),
            ("↑↓", "Navigate"),
            ("Space", "Check"),
            ("d", "Delete"),
            ("Enter", "Lessons"),
            ("r", "Reload"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        AppMode::Help => vec![("Esc", "Close help")],
        AppMode::Confirm => vec![("y", "Yes"), ("n", "Cancel")],
        AppMode::Deleting => vec![("Esc", "Hide")],
        AppMode::Message => vec![("Enter", "OK")],
    }
}

/// Footer widget showing keyboard hints and session stats
pub struct Footer<'a> {
    mode: AppMode,
    modal_open: bool,
    theme: &'a Theme,
    session_stats: &'a SessionStats,
}

impl<'a> Footer<'a> {
    pub fn new(
        mode: AppMode,
        modal_open: bool,
        theme: &'a Theme,
        session_stats: &'a SessionStats,
    ) -> Self {
        Self {
            mode,
            modal_open,
            theme,
            session_stats,
        }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let hints = hints(self.mode, self.modal_open);
        let key_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;
        for (i, (key, desc)) in hints.iter().enumerate() {
            buf.set_string(x, area.y, *key, key_style);
            x += key.chars().count() as u16 + 1;

            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.len() as u16;

            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }

            if x >= area.x + area.width - 5 {
                break;
            }
        }

        let stats = self.session_stats;
        if stats.items_deleted > 0 || stats.items_failed > 0 {
            let mut text = format!(
                "Deleted: {} item{}",
                stats.items_deleted,
                if stats.items_deleted == 1 { "" } else { "s" }
            );
            if stats.items_failed > 0 {
                text.push_str(&format!(", {} failed", stats.items_failed));
            }
            let color = if stats.items_failed > 0 {
                self.theme.red
            } else {
                self.theme.green
            };
            let stats_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            let stats_x = (area.x + area.width).saturating_sub(text.len() as u16 + 1);
            if stats_x > x + 2 {
                buf.set_string(stats_x, area.y, &text, stats_style);
            }
        }
    }
}
