//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);
        frame.render_widget(Clear, popup_area);

        let sort_keys = format!("{}..{}", keys.sort_rank, keys.sort_volume);
        let sections: [(&str, Vec<(String, &str)>); 4] = [
            (
                "Navigation",
                vec![
                    (format!("{}/↓", keys.down), "Move down"),
                    (format!("{}/↑", keys.up), "Move up"),
                    ("Home/End".to_string(), "First / last row"),
                    (format!("{}/{}", keys.prev_page, keys.next_page), "Previous / next page"),
                    (keys.select.clone(), "Open"),
                    (keys.back.clone(), "Back"),
                    ("Tab".to_string(), "Next tab"),
                ],
            ),
            (
                "Views",
                vec![
                    (keys.markets.clone(), "Markets"),
                    (keys.themes.clone(), "Themes"),
                    (keys.news.clone(), "News"),
                    (keys.search.clone(), "Search coins (articles on News)"),
                ],
            ),
            (
                "Markets and coins",
                vec![
                    (sort_keys, "Sort by rank, price, 24h, 7d, cap, volume"),
                    (keys.favorite.clone(), "Toggle favorite"),
                    (keys.trending.clone(), "Cycle trending list"),
                    (keys.timeframe.clone(), "Cycle chart timeframe"),
                ],
            ),
            (
                "Actions",
                vec![
                    (keys.refresh.clone(), "Refresh"),
                    (keys.help.clone(), "Toggle help"),
                    (keys.quit.clone(), "Quit"),
                ],
            ),
        ];

        let mut help_text = Vec::new();
        for (title, entries) in sections {
            if !help_text.is_empty() {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                title,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in entries {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {key:<10}"), Style::default().fg(Color::Cyan)),
                    Span::raw(description),
                ]));
            }
        }

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}
