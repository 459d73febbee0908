//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic. Widgets read
//! the view models in [`crate::views`]; nothing here mutates state.

mod layout;
mod widgets;

pub use layout::Layout;

use crate::config::KeyBindings;
use crate::state::{InputMode, Store, View};
use crate::views::Screens;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};
use widgets::{
    CoinDetailWidget, HelpPanel, LatestNewsWidget, MarketTableWidget, NewsDetailWidget,
    NewsFeedWidget, OverviewWidget, SearchPopup, StatusBar, TabBar, ThemeDetailWidget,
    ThemeListWidget, TrendingWidget,
};

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(frame: &mut Frame, store: &Store, screens: &Screens, keys: &KeyBindings) {
        let layout = Layout::new(frame.area());
        let view = store.app.current_view;

        StatusBar::render(frame, layout.status_area, screens, screens.is_loading(view));
        TabBar::render(frame, layout.tab_area, store);

        match view {
            View::Markets => Self::render_markets(frame, layout.main_area, screens),
            View::CoinDetail => {
                if let Some(detail) = &screens.coin_detail {
                    CoinDetailWidget::render(frame, layout.main_area, detail);
                }
            }
            View::Themes => ThemeListWidget::render(frame, layout.main_area, &screens.themes),
            View::ThemeDetail => {
                if let Some(detail) = &screens.theme_detail {
                    ThemeDetailWidget::render(frame, layout.main_area, detail);
                }
            }
            View::News => NewsFeedWidget::render(
                frame,
                layout.main_area,
                &screens.news,
                store.app.input_mode == InputMode::NewsSearch,
            ),
            View::NewsDetail => {
                if let Some(detail) = &screens.news_detail {
                    NewsDetailWidget::render(frame, layout.main_area, detail);
                }
            }
        }

        match screens.error(view) {
            Some(error) => widgets::render_error(frame, layout.footer_area, &error),
            None => widgets::render_hints(frame, layout.footer_area, Self::hints(store)),
        }

        if store.app.input_mode == InputMode::Search {
            SearchPopup::render(frame, frame.area(), &screens.search);
        }

        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), keys);
        }

        if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }
    }

    fn render_markets(frame: &mut Frame, area: Rect, screens: &Screens) {
        let columns = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(area);

        MarketTableWidget::render(frame, columns[0], &screens.table);

        let panels = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Min(4),
            ])
            .split(columns[1]);

        OverviewWidget::render(frame, panels[0], &screens.overview);
        TrendingWidget::render(frame, panels[1], &screens.trending);
        LatestNewsWidget::render(frame, panels[2], &screens.latest_news);
    }

    fn hints(store: &Store) -> &'static str {
        match (store.app.input_mode, store.app.current_view) {
            (InputMode::Search, _) => "Type to search  ↑/↓ choose  Enter open  Esc close",
            (InputMode::NewsSearch, _) => "Type keywords  Enter search  Esc cancel",
            (InputMode::Normal, View::Markets) => {
                "Enter open  f favorite  F1-F6 sort  g trending  h/l page  / search"
            }
            (InputMode::Normal, View::CoinDetail) => "t timeframe  f favorite  Enter read article  Esc back",
            (InputMode::Normal, View::Themes) => "Enter open theme  / search",
            (InputMode::Normal, View::ThemeDetail) => "Enter open coin  f favorite  h/l page  Esc back",
            (InputMode::Normal, View::News) => "Enter read  / search  Esc clear search  h/l page",
            (InputMode::Normal, View::NewsDetail) => "j/k scroll  Esc back",
        }
    }
}
