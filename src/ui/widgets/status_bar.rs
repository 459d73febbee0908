//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::common::change_style;
use crate::format::{format_compact_usd, format_percent, format_share};
use crate::views::Screens;

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, screens: &Screens, loading: bool) {
        let mut spans = vec![Span::styled(
            " ◆ CryptoGuide ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];

        if let Some(overview) = screens.overview.state().data() {
            let change = overview.market_cap_change_percentage_24h;
            spans.push(Span::raw(" | Cap "));
            spans.push(Span::raw(format_compact_usd(overview.total_market_cap)));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format_percent(change), change_style(change)));
            spans.push(Span::raw(" | Vol "));
            spans.push(Span::raw(format_compact_usd(overview.total_volume_24h)));
            spans.push(Span::raw(" | BTC "));
            spans.push(Span::raw(format_share(overview.btc_dominance)));
        }

        if loading {
            spans.push(Span::styled(
                " Loading... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));

        // Right-align the help hint
        let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let right_len = help_hint.content.chars().count();
        let padding = usize::from(area.width).saturating_sub(left_len + right_len);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(help_hint);

        let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(paragraph, area);
    }
}
