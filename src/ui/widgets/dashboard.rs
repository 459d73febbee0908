//! Side panels on the markets screen.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table},
};

use super::common::{bordered, change_style, label, refresh_marker, render_placeholder};
use crate::format::{
    format_compact_usd, format_count, format_percent, format_price, format_share,
    format_time_ago, truncate,
};
use crate::views::{LatestNewsPanel, MarketOverviewPanel, TrendingPanel, TrendingTab};

pub struct OverviewWidget;

impl OverviewWidget {
    pub fn render(frame: &mut Frame, area: Rect, panel: &MarketOverviewPanel) {
        let state = panel.state();
        let view = state.view();
        let block = bordered(format!("Market Overview{}", refresh_marker(&view)));
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(overview) = state.data() else {
            return;
        };

        let change = overview.market_cap_change_percentage_24h;
        let lines = vec![
            Line::from(vec![
                label("Market cap"),
                Span::raw(format_compact_usd(overview.total_market_cap)),
                Span::raw(" "),
                Span::styled(format_percent(change), change_style(change)),
            ]),
            Line::from(vec![
                label("Volume 24h"),
                Span::raw(format_compact_usd(overview.total_volume_24h)),
            ]),
            Line::from(vec![
                label("BTC / ETH"),
                Span::raw(format!(
                    "{} / {}",
                    format_share(overview.btc_dominance),
                    format_share(overview.eth_dominance)
                )),
            ]),
            Line::from(vec![
                label("Up / Down"),
                Span::styled(
                    format_count(overview.up_count),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(" / "),
                Span::styled(
                    format_count(overview.down_count),
                    Style::default().fg(Color::Red),
                ),
                Span::raw(format!("  of {}", format_count(overview.total_coins))),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

pub struct TrendingWidget;

impl TrendingWidget {
    pub fn render(frame: &mut Frame, area: Rect, panel: &TrendingPanel) {
        let current = panel.tab();
        let tabs: Vec<String> = TrendingTab::ALL
            .iter()
            .map(|tab| {
                if *tab == current {
                    format!("[{}]", tab.title())
                } else {
                    tab.title().to_string()
                }
            })
            .collect();

        let state = panel.state();
        let view = state.view();
        let block = bordered(format!("{}{}", tabs.join(" "), refresh_marker(&view)));
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(coins) = state.data() else {
            return;
        };

        let rows = coins.iter().map(|coin| {
            let figure = match current {
                TrendingTab::Volume => Cell::from(format_compact_usd(coin.total_volume)),
                _ => Cell::from(format_percent(coin.price_change_percentage_24h))
                    .style(change_style(coin.price_change_percentage_24h)),
            };
            Row::new(vec![
                Cell::from(coin.symbol.to_uppercase()),
                Cell::from(format_price(coin.current_price)),
                figure,
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Min(10),
                Constraint::Length(10),
            ],
        )
        .block(block);
        frame.render_widget(table, area);
    }
}

pub struct LatestNewsWidget;

impl LatestNewsWidget {
    pub fn render(frame: &mut Frame, area: Rect, panel: &LatestNewsPanel) {
        let state = panel.state();
        let view = state.view();
        let block = bordered(format!("Latest News{}", refresh_marker(&view)));
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(articles) = state.data() else {
            return;
        };

        let now = Utc::now();
        let width = usize::from(area.width.saturating_sub(14));
        let items: Vec<ListItem> = articles
            .iter()
            .map(|article| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>9} ", format_time_ago(article.published_at, now)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(truncate(&article.title, width)),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
