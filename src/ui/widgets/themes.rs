//! Theme list and theme detail screens.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState, Wrap},
};

use super::common::{bordered, header_row, refresh_marker, render_placeholder};
use super::market_table::render_coin_table;
use crate::format::{format_count, truncate};
use crate::views::{ThemeBrowser, ThemeDetail};

pub struct ThemeListWidget;

impl ThemeListWidget {
    pub fn render(frame: &mut Frame, area: Rect, browser: &ThemeBrowser) {
        let selected = browser.selected_index();
        let state = browser.state();
        let view = state.view();
        let block = bordered(format!("Themes{}", refresh_marker(&view)));
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(themes) = state.data() else {
            return;
        };

        let header = header_row(["Theme".to_string(), "Coins".to_string(), "About".to_string()]);
        let rows = themes.iter().map(|theme| {
            let count = theme
                .crypto_count
                .map(|c| u32::try_from(c).unwrap_or(u32::MAX));
            Row::new(vec![
                Cell::from(theme.name.clone()).style(Style::default().fg(Color::Magenta)),
                Cell::from(format_count(count)),
                Cell::from(truncate(theme.description.as_deref().unwrap_or_default(), 80)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(24),
                Constraint::Length(8),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut table_state = TableState::default();
        table_state.select(selected);
        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

pub struct ThemeDetailWidget;

impl ThemeDetailWidget {
    pub fn render(frame: &mut Frame, area: Rect, detail: &ThemeDetail) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        Self::render_header(frame, chunks[0], detail);
        Self::render_coins(frame, chunks[1], detail);
    }

    fn render_header(frame: &mut Frame, area: Rect, detail: &ThemeDetail) {
        let state = detail.theme();
        let view = state.view();
        let block = bordered(detail.slug());
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(theme) = state.data() else {
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                theme.name.clone(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(theme.description.clone().unwrap_or_default()),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_coins(frame: &mut Frame, area: Rect, detail: &ThemeDetail) {
        let selected = detail.selected_index();
        let state = detail.coins();
        let view = state.view();
        let title = format!("Coins  {}{}", detail.pager().label(), refresh_marker(&view));
        if !render_placeholder(frame, area, bordered(title.clone()), &view) {
            return;
        }
        let Some(page) = state.data() else {
            return;
        };

        render_coin_table(
            frame,
            area,
            bordered(title),
            &page.content,
            selected,
            |id| detail.is_favorite(id),
            None,
        );
    }
}
