use academy_core::{BatchProgress, TableId};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use super::layout::dialog_rect;
use super::theme::Theme;

/// Unicode partial block characters for smooth progress bars
const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Progress bar of `width` cells using partial block characters
pub fn render_bar(percentage: f64, width: usize) -> String {
    let percentage = percentage.clamp(0.0, 100.0);
    let filled_width = (percentage / 100.0) * width as f64;
    let full_blocks = (filled_width.floor() as usize).min(width);
    let partial = ((filled_width - full_blocks as f64) * 8.0).round() as usize;

    let mut bar: String = std::iter::repeat_n(BLOCKS[8], full_blocks).collect();
    if full_blocks < width && partial > 0 {
        bar.push(BLOCKS[partial.min(8)]);
    }
    let current_len = bar.chars().count();
    bar.extend(std::iter::repeat_n(' ', width - current_len));
    bar
}

/// Overlay showing how far a delete batch has come
pub struct DeleteProgressView<'a> {
    table: TableId,
    progress: BatchProgress,
    theme: &'a Theme,
}

impl<'a> DeleteProgressView<'a> {
    pub fn new(table: TableId, progress: BatchProgress, theme: &'a Theme) -> Self {
        Self {
            table,
            progress,
            theme,
        }
    }
}

impl Widget for DeleteProgressView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = dialog_rect(50, 10, area);
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(format!(" Deleting from {}... ", self.table.label()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.yellow))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.height < 3 {
            return;
        }

        let text_style = Style::default().fg(self.theme.fg);
        let mut row = inner.y;

        let count_str = format!(
            "{} / {} completed",
            self.progress.completed, self.progress.expected
        );
        buf.set_string(inner.x, row, &count_str, text_style);
        row += 1;

        let bar = render_bar(
            self.progress.percentage(),
            (inner.width as usize).saturating_sub(2),
        );
        buf.set_string(inner.x, row, &bar, Style::default().fg(self.theme.green));
        row += 2;

        if self.progress.failed > 0 {
            buf.set_string(
                inner.x,
                row,
                format!("{} failed", self.progress.failed),
                Style::default()
                    .fg(self.theme.red)
                    .add_modifier(Modifier::BOLD),
            );
            row += 1;
        }

        let hint_y = row.max(inner.y + inner.height - 1);
        if hint_y < inner.y + inner.height {
            buf.set_string(
                inner.x,
                hint_y,
                "Esc to hide (deletes continue in background)",
                Style::default().fg(self.theme.fg_dim),
            );
        }
    }
}
