//! Tab bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{Store, Tab};

/// Tab bar widget.
pub struct TabBar;

impl TabBar {
    /// Render the tab bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let active = store.app.current_view.tab();
        let mut spans = vec![Span::raw(" ")];

        for (index, tab) in Tab::ALL.iter().enumerate() {
            let name_style = if *tab == active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };

            spans.push(Span::styled(
                format!("[{}] ", index + 1),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::styled(tab.title(), name_style));
            spans.push(Span::raw("  "));
        }

        if store.app.current_view.is_detail() {
            spans.push(Span::styled(
                "Esc back",
                Style::default().fg(Color::DarkGray),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
