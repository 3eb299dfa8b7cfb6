use ratatui::style::{Color, Style};

/// Catppuccin Mocha-inspired dark theme with 24-bit RGB colors
pub struct Theme {
    pub bg: Color,
    pub bg_surface: Color,
    pub bg_highlight: Color,
    pub fg: Color,
    pub fg_dim: Color,
    pub fg_muted: Color,

    pub blue: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub purple: Color,

    pub border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Rgb(30, 30, 46),           // Base
            bg_surface: Color::Rgb(49, 50, 68),   // Surface0
            bg_highlight: Color::Rgb(69, 71, 90), // Surface1
            fg: Color::Rgb(205, 214, 244),        // Text
            fg_dim: Color::Rgb(166, 173, 200),    // Subtext0
            fg_muted: Color::Rgb(127, 132, 156),  // Overlay0

            blue: Color::Rgb(137, 180, 250),   // Blue
            green: Color::Rgb(166, 227, 161),  // Green
            yellow: Color::Rgb(249, 226, 175), // Yellow
            red: Color::Rgb(243, 139, 168),    // Red
            purple: Color::Rgb(203, 166, 247), // Mauve

            border: Color::Rgb(88, 91, 112),         // Surface2
            selection_bg: Color::Rgb(137, 180, 250), // Blue
            selection_fg: Color::Rgb(30, 30, 46),    // Base
        }
    }
}

impl Theme {
    /// Base style of a table row
    pub fn row_style(&self, is_cursor: bool, is_checked: bool) -> Style {
        if is_cursor {
            Style::default().bg(self.selection_bg).fg(self.selection_fg)
        } else if is_checked {
            Style::default().bg(self.bg_highlight).fg(self.fg)
        } else {
            Style::default().bg(self.bg).fg(self.fg)
        }
    }

    /// Style for a cell that carries its own accent color
    pub fn accent(&self, row: Style, is_cursor: bool, color: Color) -> Style {
        if is_cursor { row } else { row.fg(color) }
    }
}
