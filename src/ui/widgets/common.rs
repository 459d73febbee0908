//! Pieces shared by several widgets.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row},
};
use rust_decimal::Decimal;

use crate::state::ResourceView;

pub fn header_row<'a>(titles: impl IntoIterator<Item = String>) -> Row<'a> {
    let cells = titles.into_iter().map(|title| {
        Cell::from(title).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells).height(1).bottom_margin(1)
}

pub fn bordered(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

/// Green for gains, red for losses, grey when unknown.
pub fn change_style(value: Option<Decimal>) -> Style {
    match value {
        Some(v) if v >= Decimal::ZERO => Style::default().fg(Color::Green),
        Some(_) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    }
}

pub fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{text:<12}"), Style::default().fg(Color::DarkGray))
}

/// Render the loading, failed or idle state of a resource.
///
/// Returns `true` when the resource has data and the caller should draw it.
pub fn render_placeholder<T>(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    view: &ResourceView<'_, T>,
) -> bool {
    let line = match view {
        ResourceView::Ready { .. } => return true,
        ResourceView::Idle => Line::from(""),
        ResourceView::Loading => Line::from(Span::styled(
            "Loading...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )),
        ResourceView::Failed(error) => Line::from(vec![
            Span::styled(
                "✗ ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(error.to_string()),
            Span::styled("  (r to retry)", Style::default().fg(Color::DarkGray)),
        ]),
    };

    let paragraph = Paragraph::new(line).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
    false
}

/// Title suffix showing a background refresh or a failed one.
pub fn refresh_marker<T>(view: &ResourceView<'_, T>) -> &'static str {
    match view {
        ResourceView::Ready {
            stale_error: Some(_),
            ..
        } => " (stale)",
        ResourceView::Ready {
            refreshing: true, ..
        } => " ↻",
        _ => "",
    }
}
