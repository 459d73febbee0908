//! Market table widget.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Cell, Row, Table, TableState},
};

use super::common::{bordered, change_style, header_row, refresh_marker, render_placeholder};
use crate::api::Cryptocurrency;
use crate::format::{format_compact_usd, format_count, format_percent, format_price, truncate};
use crate::state::{SortField, SortState};
use crate::views::MarketTable;

/// Market table widget.
pub struct MarketTableWidget;

impl MarketTableWidget {
    /// Render the current page of the market table.
    pub fn render(frame: &mut Frame, area: Rect, table: &MarketTable) {
        let state = table.state();
        let view = state.view();
        let title = format!(
            "Markets  {}{}",
            table.pager().label(),
            refresh_marker(&view)
        );
        if !render_placeholder(frame, area, bordered(title.clone()), &view) {
            return;
        }
        drop(state);

        let rows = table.rows();
        render_coin_table(
            frame,
            area,
            bordered(title),
            &rows,
            table.selected_index(),
            |id| table.is_favorite(id),
            Some(table.sort()),
        );
    }
}

/// Draw coins as a table. Sortable tables pass their sort state to mark the
/// active column.
pub fn render_coin_table(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    coins: &[Cryptocurrency],
    selected: Option<usize>,
    is_favorite: impl Fn(&str) -> bool,
    sort: Option<SortState>,
) {
    let column = |field: SortField| match sort {
        Some(sort) => format!("{}{}", field.label(), sort.indicator(field)),
        None => field.label().to_string(),
    };
    let header = header_row([
        " ".to_string(),
        column(SortField::Rank),
        "Coin".to_string(),
        column(SortField::Price),
        column(SortField::Change24h),
        column(SortField::Change7d),
        column(SortField::MarketCap),
        column(SortField::Volume24h),
    ]);

    let rows = coins.iter().map(|coin| {
        let star = if is_favorite(&coin.coin_id) {
            Cell::from("★").style(Style::default().fg(Color::Yellow))
        } else {
            Cell::from("☆").style(Style::default().fg(Color::DarkGray))
        };

        Row::new(vec![
            star,
            Cell::from(format_count(coin.market_cap_rank)),
            Cell::from(format!(
                "{} {}",
                truncate(&coin.name, 18),
                coin.symbol.to_uppercase()
            )),
            Cell::from(format_price(coin.current_price)),
            Cell::from(format_percent(coin.price_change_percentage_24h))
                .style(change_style(coin.price_change_percentage_24h)),
            Cell::from(format_percent(coin.price_change_percentage_7d))
                .style(change_style(coin.price_change_percentage_7d)),
            Cell::from(format_compact_usd(coin.market_cap)),
            Cell::from(format_compact_usd(coin.total_volume)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(selected);

    frame.render_stateful_widget(table, area, &mut state);
}
