use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout
pub struct AppLayout {
    pub header: Rect,
    pub table: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header with tabs
                Constraint::Min(3),    // Column titles and rows
                Constraint::Length(1), // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            table: chunks[1],
            footer: chunks[2],
        }
    }
}

/// Calculate centered rectangle for overlays
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_width = area.width * percent_x / 100;
    let popup_height = area.height * percent_y / 100;

    let x = area.x + (area.width - popup_width) / 2;
    let y = area.y + (area.height - popup_height) / 2;

    Rect::new(x, y, popup_width, popup_height)
}

/// Fixed-size box centered in `area`, shrunk to leave a margin
pub fn dialog_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn test_dialog_rect_shrinks_to_fit() {
        let r = dialog_rect(60, 12, Rect::new(0, 0, 30, 10));
        assert_eq!(r, Rect::new(2, 2, 26, 6));
    }
}
