//! Coin detail screen.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Sparkline, Wrap},
};

use super::common::{bordered, change_style, label, refresh_marker, render_placeholder};
use crate::api::{Cryptocurrency, Timeframe};
use crate::format::{
    format_compact_usd, format_count, format_datetime, format_percent, format_price,
    format_share, format_supply, format_time_ago, truncate,
};
use crate::state::ResourceView;
use crate::views::CoinDetail;

pub struct CoinDetailWidget;

impl CoinDetailWidget {
    pub fn render(frame: &mut Frame, area: Rect, detail: &CoinDetail) {
        let state = detail.coin();
        let view = state.view();
        let block = bordered(format!("{}{}", detail.coin_id(), refresh_marker(&view)));
        if !render_placeholder(frame, area, block, &view) {
            return;
        }
        let Some(coin) = state.data() else {
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),  // Header
                Constraint::Length(10), // Chart
                Constraint::Min(6),     // Stats and news
            ])
            .split(area);

        Self::render_header(frame, rows[0], coin, detail.is_favorite());
        Self::render_chart(frame, rows[1], detail);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        Self::render_stats(frame, bottom[0], coin);
        Self::render_news(frame, bottom[1], detail);
    }

    fn render_header(frame: &mut Frame, area: Rect, coin: &Cryptocurrency, favorite: bool) {
        let star = if favorite {
            Span::styled("★ ", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("☆ ", Style::default().fg(Color::DarkGray))
        };
        let themes: Vec<&str> = coin.themes().map(|t| t.name.as_str()).collect();

        let lines = vec![
            Line::from(vec![
                star,
                Span::styled(
                    coin.name.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    " {}  #{}",
                    coin.symbol.to_uppercase(),
                    format_count(coin.market_cap_rank)
                )),
            ]),
            Line::from(vec![
                Span::styled(
                    format_price(coin.current_price),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format_percent(coin.price_change_percentage_24h),
                    change_style(coin.price_change_percentage_24h),
                ),
                Span::styled(" 24h", Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(Span::styled(
                themes.join(" › "),
                Style::default().fg(Color::Magenta),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).block(bordered("Overview")), area);
    }

    fn render_chart(frame: &mut Frame, area: Rect, detail: &CoinDetail) {
        let timeframe = detail.timeframe();
        let labels: Vec<String> = Timeframe::ALL
            .iter()
            .map(|tf| {
                if *tf == timeframe {
                    format!("[{}]", tf.label())
                } else {
                    tf.label().to_string()
                }
            })
            .collect();
        let change = detail.period_change();
        let title = format!(
            "Price  {}  {}  (t to change)",
            labels.join(" "),
            format_percent(change)
        );

        let current = detail.chart_is_current();
        let state = detail.history();
        // A series for another timeframe is not shown under this one's label.
        let view = match state.view() {
            ResourceView::Ready {
                stale_error: Some(error),
                refreshing: false,
                ..
            } if !current => ResourceView::Failed(error),
            ResourceView::Ready { .. } if !current => ResourceView::Loading,
            view => view,
        };
        let block = bordered(title);
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        drop(state);

        let points = detail.sparkline();
        let color = if change.is_some_and(|c| c.is_sign_negative()) {
            Color::Red
        } else {
            Color::Green
        };
        let sparkline = Sparkline::default()
            .block(block)
            .data(&points)
            .max(100)
            .style(Style::default().fg(color));
        frame.render_widget(sparkline, area);
    }

    fn render_stats(frame: &mut Frame, area: Rect, coin: &Cryptocurrency) {
        let mut lines = vec![
            Line::from(vec![label("Market cap"), Span::raw(format_compact_usd(coin.market_cap))]),
            Line::from(vec![
                label("Volume 24h"),
                Span::raw(format_compact_usd(coin.total_volume)),
            ]),
            Line::from(vec![
                label("24h range"),
                Span::raw(format!(
                    "{} - {}",
                    format_price(coin.low_24h),
                    format_price(coin.high_24h)
                )),
            ]),
            Line::from(vec![
                label("7d / 30d"),
                Span::styled(
                    format_percent(coin.price_change_percentage_7d),
                    change_style(coin.price_change_percentage_7d),
                ),
                Span::raw(" / "),
                Span::styled(
                    format_percent(coin.price_change_percentage_30d),
                    change_style(coin.price_change_percentage_30d),
                ),
            ]),
            Line::from(vec![
                label("Circulating"),
                Span::raw(format_supply(coin.circulating_supply)),
            ]),
            Line::from(vec![
                label("Max supply"),
                Span::raw(match coin.max_supply {
                    Some(_) => format!(
                        "{} ({} issued)",
                        format_supply(coin.max_supply),
                        format_share(coin.supply_ratio())
                    ),
                    None => "∞".to_string(),
                }),
            ]),
            Line::from(vec![
                label("ATH"),
                Span::raw(format!(
                    "{} on {}",
                    format_price(coin.ath),
                    format_datetime(coin.ath_date)
                )),
            ]),
            Line::from(vec![
                label("ATL"),
                Span::raw(format!(
                    "{} on {}",
                    format_price(coin.atl),
                    format_datetime(coin.atl_date)
                )),
            ]),
        ];

        for (name, link) in coin.links() {
            lines.push(Line::from(vec![
                label(name),
                Span::styled(link.to_string(), Style::default().fg(Color::Blue)),
            ]));
        }

        if let Some(description) = coin.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(Line::from(""));
            lines.push(Line::from(description.to_string()));
        }

        let paragraph = Paragraph::new(lines)
            .block(bordered("Stats"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_news(frame: &mut Frame, area: Rect, detail: &CoinDetail) {
        let selected = detail.selected_news_index();
        let state = detail.related();
        let view = state.view();
        let block = bordered("Related News");
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(page) = state.data() else {
            return;
        };

        let now = Utc::now();
        let width = usize::from(area.width.saturating_sub(16));
        let items: Vec<ListItem> = page
            .content
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

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}
