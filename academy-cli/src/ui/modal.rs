use academy_core::{SelectionTracker, TableId};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Widget},
};

use crate::app::TableData;

use super::layout::centered_rect;
use super::table_view::TableView;
use super::theme::Theme;

/// Popup area for the lessons of a series or school
pub fn modal_area(area: Rect) -> Rect {
    centered_rect(86, 80, area)
}

/// Rows visible in the popup's table
pub fn modal_visible_rows(area: Rect) -> usize {
    // Border (2) and the column header (1)
    modal_area(area).height.saturating_sub(3) as usize
}

/// Lessons popup: a bordered box holding its own lessons table
pub struct ModalView<'a> {
    title: &'a str,
    data: &'a TableData,
    tracker: &'a SelectionTracker,
    loading: bool,
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> ModalView<'a> {
    pub fn new(
        title: &'a str,
        data: &'a TableData,
        tracker: &'a SelectionTracker,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
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
}

impl Widget for ModalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = modal_area(area);
        Clear.render(popup, buf);

        let checked = self.tracker.count_in(TableId::Modal);
        let title = if checked > 0 {
            format!(" {} ({} checked) ", self.title, checked)
        } else {
            format!(" {} ", self.title)
        };
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.purple))
            .style(Style::default().bg(self.theme.bg));

        let inner = block.inner(popup);
        block.render(popup, buf);

        TableView::new(TableId::Modal, self.data, self.tracker, self.theme)
            .loading(self.loading, self.spinner_frame)
            .render(inner, buf);
    }
}
