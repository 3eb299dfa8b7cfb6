use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use super::layout::dialog_rect;
use super::theme::Theme;

const HELP_ITEMS: [(&str, &str, bool); 24] = [
    ("", "Tables", true),
    ("Tab →", "Next table", false),
    ("S-Tab ←", "Previous table", false),
    ("Enter", "View lessons of series/school", false),
    ("Esc q", "Close lessons popup", false),
    ("r", "Reload table", false),
    ("", "", false),
    ("", "Navigation", true),
    ("↑ k", "Move up", false),
    ("↓ j", "Move down", false),
    ("PgUp/PgDn", "Page up/down", false),
    ("Home g", "Go to first", false),
    ("End G", "Go to last", false),
    ("", "", false),
    ("", "Deleting", true),
    ("Space x", "Check/uncheck row", false),
    ("a", "Uncheck all", false),
    ("d", "Delete checked rows, or this row", false),
    ("", "Schools with lessons show -- and can't go", false),
    ("", "", false),
    ("", "Other", true),
    ("?", "Toggle this help", false),
    ("q Ctrl+C", "Quit", false),
    ("", "", false),
];

/// Help overlay widget
pub struct HelpView<'a> {
    theme: &'a Theme,
}

impl<'a> HelpView<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let help_area = dialog_rect(54, HELP_ITEMS.len() as u16 + 3, area);
        Clear.render(help_area, buf);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.blue))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::horizontal(1));

        let inner = block.inner(help_area);
        block.render(help_area, buf);

        let key_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg);
        let note_style = Style::default().fg(self.theme.fg_muted);
        let section_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);

        for (i, (key, desc, is_section)) in HELP_ITEMS.iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }
            let y = inner.y + i as u16;

            if *is_section {
                buf.set_string(inner.x, y, *desc, section_style);
            } else if !key.is_empty() {
                buf.set_string(inner.x, y, format!("{:12}", key), key_style);
                buf.set_string(inner.x + 12, y, *desc, desc_style);
            } else if !desc.is_empty() {
                buf.set_string(inner.x + 12, y, *desc, note_style);
            }
        }
    }
}
