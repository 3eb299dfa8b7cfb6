use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use super::layout::dialog_rect;
use super::theme::Theme;

/// Message box with a single OK button
pub struct MessageView<'a> {
    message: &'a str,
    /// Further messages waiting behind this one
    queued: usize,
    theme: &'a Theme,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a str, queued: usize, theme: &'a Theme) -> Self {
        Self {
            message,
            queued,
            theme,
        }
    }
}

impl Widget for MessageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = dialog_rect(56, 9, area);
        Clear.render(dialog_area, buf);

        let title = if self.queued > 0 {
            format!(" Message (+{}) ", self.queued)
        } else {
            " Message ".to_string()
        };
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.blue))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.height < 2 {
            return;
        }

        let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
        Paragraph::new(self.message)
            .style(Style::default().fg(self.theme.fg))
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        let ok = "[ OK ]";
        let x = inner.x + inner.width.saturating_sub(ok.len() as u16) / 2;
        buf.set_string(
            x,
            inner.y + inner.height - 1,
            ok,
            Style::default()
                .fg(self.theme.green)
                .add_modifier(Modifier::BOLD),
        );
    }
}
