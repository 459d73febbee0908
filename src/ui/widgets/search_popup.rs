//! Coin search popup.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
};

use super::super::layout::centered_rect;
use super::common::{bordered, change_style, render_placeholder};
use crate::format::{format_count, format_percent, format_price};
use crate::views::CoinSearch;

pub struct SearchPopup;

impl SearchPopup {
    pub fn render(frame: &mut Frame, area: Rect, search: &CoinSearch) {
        let popup_area = centered_rect(50, 50, area);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(popup_area);

        let pending = if search.is_pending() { " …" } else { "" };
        let input = Paragraph::new(Line::from(vec![
            Span::raw(search.input().to_string()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::styled(pending, Style::default().fg(Color::DarkGray)),
        ]))
        .block(bordered("Search coins").border_style(Style::default().fg(Color::Yellow)));
        frame.render_widget(input, chunks[0]);

        // Read before borrowing the results; the channel is not re-entrant
        let highlighted = search.highlighted();
        let state = search.results();
        let view = state.view();
        let block = bordered("Results");
        if !render_placeholder(frame, chunks[1], block.clone(), &view) {
            return;
        }
        let Some(coins) = state.data() else {
            return;
        };

        if coins.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No matching coins",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = coins
            .iter()
            .map(|coin| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("#{:<5}", format_count(coin.market_cap_rank)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{} ", coin.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("{}  ", coin.symbol.to_uppercase())),
                    Span::raw(format!("{}  ", format_price(coin.current_price))),
                    Span::styled(
                        format_percent(coin.price_change_percentage_24h),
                        change_style(coin.price_change_percentage_24h),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default().with_selected(highlighted);
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }
}
