//! Layout management for the TUI.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// UI layout areas.
pub struct Layout {
    /// Status bar area (top).
    pub status_area: Rect,
    /// Tab bar area.
    pub tab_area: Rect,
    /// Main content area.
    pub main_area: Rect,
    /// Footer line for errors and key hints.
    pub footer_area: Rect,
    /// Notification area (overlaid).
    pub notification_area: Rect,
}

impl Layout {
    /// Create a new layout from the terminal area.
    pub fn new(area: Rect) -> Self {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Tab bar
                Constraint::Min(0),    // Main content
                Constraint::Length(1), // Footer
            ])
            .split(area);

        // Top-right corner of the main area
        let width = (area.width / 3).max(30).min(area.width);
        let notification_area = Rect {
            x: area.x + area.width - width,
            y: chunks[2].y,
            width,
            height: 3.min(chunks[2].height),
        };

        Self {
            status_area: chunks[0],
            tab_area: chunks[1],
            main_area: chunks[2],
            footer_area: chunks[3],
            notification_area,
        }
    }
}

/// Create a centered popup area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layout_splits_rows() {
        let layout = Layout::new(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.tab_area.y, 1);
        assert_eq!(layout.main_area.height, 37);
        assert_eq!(layout.footer_area.y, 39);
        assert_eq!(layout.notification_area.width, 40);
        assert_eq!(layout.notification_area.x, 80);
    }

    #[test]
    fn test_tiny_terminal_does_not_overflow() {
        let layout = Layout::new(Rect::new(0, 0, 20, 4));
        assert_eq!(layout.notification_area.width, 20);
        assert_eq!(layout.notification_area.height, 1);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.x, 20);
    }
}
