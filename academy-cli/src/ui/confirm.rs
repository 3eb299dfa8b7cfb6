use academy_core::ConfirmPrompt;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use super::layout::dialog_rect;
use super::table_view::truncate;
use super::theme::Theme;

/// Names listed before the rest are summarized
const SHOWN_ENTRIES: usize = 5;

/// Delete confirmation dialog for one row or a whole selection
pub struct ConfirmDeleteView<'a> {
    prompt: &'a ConfirmPrompt,
    theme: &'a Theme,
}

impl<'a> ConfirmDeleteView<'a> {
    pub fn new(prompt: &'a ConfirmPrompt, theme: &'a Theme) -> Self {
        Self { prompt, theme }
    }
}

impl Widget for ConfirmDeleteView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.prompt.entries.len();
        let show_count = count.min(SHOWN_ENTRIES);
        let has_more = count > SHOWN_ENTRIES;

        // body(2) + blank + names + more + blank + hints, plus borders and padding
        let content_lines = 2 + 1 + show_count + usize::from(has_more) + 1 + 1;
        let dialog_area = dialog_rect(60, content_lines as u16 + 4, area);

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.prompt.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.red))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.height < 2 {
            return;
        }

        let text_style = Style::default().fg(self.theme.fg);
        let name_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let dim_style = Style::default().fg(self.theme.fg_dim);
        let key_style = Style::default()
            .fg(self.theme.green)
            .add_modifier(Modifier::BOLD);

        Paragraph::new(self.prompt.body.as_str())
            .style(text_style)
            .wrap(Wrap { trim: true })
            .render(Rect::new(inner.x, inner.y, inner.width, 2), buf);

        let mut row = inner.y + 3;
        let max_w = (inner.width as usize).saturating_sub(2);
        let last = inner.y + inner.height - 1;

        for (name, _) in self.prompt.entries.iter().take(SHOWN_ENTRIES) {
            if row >= last {
                break;
            }
            buf.set_string(inner.x + 1, row, truncate(name, max_w), name_style);
            row += 1;
        }
        if has_more && row < last {
            let more_text = format!(" ...and {} more", count - SHOWN_ENTRIES);
            buf.set_string(inner.x, row, &more_text, dim_style);
        }

        buf.set_string(inner.x, last, "[y]", key_style);
        buf.set_string(inner.x + 4, last, "Yes, delete", text_style);
        buf.set_string(inner.x + 18, last, "[n]", key_style);
        buf.set_string(inner.x + 22, last, "Cancel", text_style);
    }
}
