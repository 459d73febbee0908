//! Owns every view model and routes actions to the visible one.

use super::{
    CoinDetail, CoinSearch, LatestNewsPanel, MarketOverviewPanel, MarketTable, NewsDetail,
    NewsFeed, SearchOutcome, ThemeBrowser, ThemeDetail, TrendingPanel, ViewContext,
};
use crate::state::{Action, InputMode, Notification, Phase, Store, View};
use tracing::{debug, info};

/// The view models behind every screen.
///
/// Polling views are mounted while visible and unmounted when left. Detail
/// views are created on open and dropped once they are neither visible nor
/// in the back history.
pub struct Screens {
    ctx: ViewContext,
    pub overview: MarketOverviewPanel,
    pub trending: TrendingPanel,
    pub latest_news: LatestNewsPanel,
    pub table: MarketTable,
    pub themes: ThemeBrowser,
    pub theme_detail: Option<ThemeDetail>,
    pub news: NewsFeed,
    pub news_detail: Option<NewsDetail>,
    pub coin_detail: Option<CoinDetail>,
    pub search: CoinSearch,
}

impl Screens {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            overview: MarketOverviewPanel::new(&ctx),
            trending: TrendingPanel::new(&ctx),
            latest_news: LatestNewsPanel::new(&ctx),
            table: MarketTable::new(&ctx),
            themes: ThemeBrowser::new(&ctx),
            theme_detail: None,
            news: NewsFeed::new(&ctx),
            news_detail: None,
            coin_detail: None,
            search: CoinSearch::new(&ctx),
            ctx,
        }
    }

    /// Mount the views for the store's current view.
    pub fn start(&mut self, store: &Store) {
        self.enter(store.app.current_view);
    }

    /// Per-frame bookkeeping: page totals and cursor bounds.
    pub fn sync(&mut self) {
        self.table.sync();
        self.news.sync();
        if let Some(detail) = &mut self.theme_detail {
            detail.sync();
        }
    }

    /// Whether any resource on the visible screen is fetching.
    pub fn is_loading(&self, view: View) -> bool {
        let phases = match view {
            View::Markets => vec![
                self.table.state().phase(),
                self.overview.state().phase(),
                self.trending.state().phase(),
                self.latest_news.state().phase(),
            ],
            View::CoinDetail => self.coin_detail.as_ref().map_or_else(Vec::new, |d| {
                vec![d.coin().phase(), d.history().phase(), d.related().phase()]
            }),
            View::Themes => vec![self.themes.state().phase()],
            View::ThemeDetail => self.theme_detail.as_ref().map_or_else(Vec::new, |d| {
                vec![d.theme().phase(), d.coins().phase()]
            }),
            View::News => vec![self.news.state().phase()],
            View::NewsDetail => self.news_detail.as_ref().map_or_else(Vec::new, |d| {
                vec![d.state().phase(), d.related().phase()]
            }),
        };
        phases.contains(&Phase::Loading)
    }

    /// The first failure on the visible screen, if any.
    pub fn error(&self, view: View) -> Option<String> {
        let errors = match view {
            View::Markets => vec![
                self.table.state().error.clone(),
                self.overview.state().error.clone(),
                self.trending.state().error.clone(),
                self.latest_news.state().error.clone(),
            ],
            View::CoinDetail => self.coin_detail.as_ref().map_or_else(Vec::new, |d| {
                vec![
                    d.coin().error.clone(),
                    d.history().error.clone(),
                    d.related().error.clone(),
                ]
            }),
            View::Themes => vec![self.themes.state().error.clone()],
            View::ThemeDetail => self.theme_detail.as_ref().map_or_else(Vec::new, |d| {
                vec![d.theme().error.clone(), d.coins().error.clone()]
            }),
            View::News => vec![self.news.state().error.clone()],
            View::NewsDetail => self.news_detail.as_ref().map_or_else(Vec::new, |d| {
                vec![d.state().error.clone(), d.related().error.clone()]
            }),
        };
        errors.into_iter().flatten().next()
    }

    /// Apply an action to the store and the visible view.
    pub fn apply(&mut self, store: &mut Store, action: Action) {
        debug!(?action, "apply");
        match action {
            Action::SetView(view) => self.navigate(store, view),
            Action::Back => self.back(store),
            Action::SetInputMode(InputMode::Search) => {
                self.search.reset();
                store.app.input_mode = InputMode::Search;
            }
            Action::Select => self.select(store),
            Action::ScrollUp => self.scroll_up(store),
            Action::ScrollDown => self.scroll_down(store),
            Action::GoToTop => self.go_to_top(store.app.current_view),
            Action::GoToBottom => self.go_to_bottom(store.app.current_view),
            Action::NextPage => {
                self.next_page(store.app.current_view);
            }
            Action::PrevPage => {
                self.prev_page(store.app.current_view);
            }
            Action::SortBy(field) => self.table.sort_by(field),
            Action::ToggleFavorite => self.toggle_favorite(store),
            Action::CycleTimeframe => {
                if let Some(detail) = &self.coin_detail {
                    detail.cycle_timeframe();
                }
            }
            Action::CycleTrending => {
                self.trending.cycle_tab();
            }
            Action::InputChar(c) => match store.app.input_mode {
                InputMode::Search => self.search.push_char(c),
                InputMode::NewsSearch => self.news.push_char(c),
                InputMode::Normal => {}
            },
            Action::InputBackspace => match store.app.input_mode {
                InputMode::Search => self.search.pop_char(),
                InputMode::NewsSearch => self.news.pop_char(),
                InputMode::Normal => {}
            },
            Action::SubmitInput => self.submit_input(store),
            Action::CancelInput => {
                if store.app.input_mode == InputMode::Search {
                    self.search.reset();
                }
                store.app.input_mode = InputMode::Normal;
            }
            Action::ClearNewsSearch => {
                self.news.clear_search();
            }
            Action::Refresh => self.refresh(store.app.current_view),
            other => {
                store.reduce(&other);
            }
        }
    }

    fn navigate(&mut self, store: &mut Store, view: View) {
        let previous = store.app.current_view;
        self.leave(previous);
        store.app.open(view);
        self.enter(store.app.current_view);
        self.prune(store);
    }

    fn back(&mut self, store: &mut Store) {
        if store.app.history.is_empty() {
            return;
        }
        let previous = store.app.current_view;
        self.leave(previous);
        store.app.back();
        self.enter(store.app.current_view);
        self.prune(store);
    }

    fn enter(&mut self, view: View) {
        match view {
            View::Markets => {
                self.overview.mount();
                self.trending.mount();
                self.latest_news.mount();
                self.table.mount();
            }
            View::CoinDetail => {
                if let Some(detail) = &mut self.coin_detail {
                    detail.mount();
                }
            }
            View::Themes => {
                self.themes.mount();
            }
            View::ThemeDetail => {
                if let Some(detail) = &mut self.theme_detail {
                    detail.mount();
                }
            }
            View::News => {
                self.news.mount();
            }
            View::NewsDetail => {
                if let Some(detail) = &mut self.news_detail {
                    detail.mount();
                }
            }
        }
    }

    fn leave(&mut self, view: View) {
        match view {
            View::Markets => {
                self.overview.unmount();
                self.trending.unmount();
                self.latest_news.unmount();
                self.table.unmount();
            }
            View::CoinDetail => {
                if let Some(detail) = &mut self.coin_detail {
                    detail.unmount();
                }
            }
            View::ThemeDetail => {
                if let Some(detail) = &mut self.theme_detail {
                    detail.unmount();
                }
            }
            View::Themes | View::News | View::NewsDetail => {}
        }
    }

    /// Drop detail views that can no longer be reached.
    fn prune(&mut self, store: &Store) {
        let reachable =
            |view: View| store.app.current_view == view || store.app.history.contains(&view);
        if !reachable(View::CoinDetail) {
            self.coin_detail = None;
        }
        if !reachable(View::ThemeDetail) {
            self.theme_detail = None;
        }
        if !reachable(View::NewsDetail) {
            self.news_detail = None;
        }
    }

    fn open_coin(&mut self, store: &mut Store, coin_id: String) {
        info!(%coin_id, "open coin");
        self.leave(store.app.current_view);
        self.coin_detail = Some(CoinDetail::new(&self.ctx, coin_id));
        store.app.open(View::CoinDetail);
        self.enter(View::CoinDetail);
        self.prune(store);
    }

    fn open_theme(&mut self, store: &mut Store, slug: String) {
        info!(%slug, "open theme");
        self.leave(store.app.current_view);
        self.theme_detail = Some(ThemeDetail::new(&self.ctx, slug));
        store.app.open(View::ThemeDetail);
        self.enter(View::ThemeDetail);
        self.prune(store);
    }

    fn open_news(&mut self, store: &mut Store, id: i64) {
        info!(id, "open article");
        self.leave(store.app.current_view);
        self.news_detail = Some(NewsDetail::new(&self.ctx, id));
        store.app.open(View::NewsDetail);
        self.enter(View::NewsDetail);
        self.prune(store);
    }

    fn select(&mut self, store: &mut Store) {
        match store.app.current_view {
            View::Markets => {
                if let Some(coin) = self.table.selected() {
                    self.open_coin(store, coin.coin_id);
                }
            }
            View::CoinDetail => {
                if let Some(id) = self.coin_detail.as_ref().and_then(|d| d.selected_news_id()) {
                    self.open_news(store, id);
                }
            }
            View::Themes => {
                if let Some(slug) = self.themes.selected_slug() {
                    self.open_theme(store, slug);
                }
            }
            View::ThemeDetail => {
                if let Some(id) = self
                    .theme_detail
                    .as_ref()
                    .and_then(|d| d.selected_coin_id())
                {
                    self.open_coin(store, id);
                }
            }
            View::News => {
                if let Some(id) = self.news.selected_id() {
                    self.open_news(store, id);
                }
            }
            View::NewsDetail => {}
        }
    }

    fn submit_input(&mut self, store: &mut Store) {
        match store.app.input_mode {
            InputMode::Search => {
                if let (SearchOutcome::Open(coin_id), _) = self.search.confirm() {
                    store.app.input_mode = InputMode::Normal;
                    self.open_coin(store, coin_id);
                }
            }
            InputMode::NewsSearch => {
                self.news.submit_search();
                store.app.input_mode = InputMode::Normal;
            }
            InputMode::Normal => {}
        }
    }

    fn scroll_up(&mut self, store: &Store) {
        if store.app.input_mode == InputMode::Search {
            self.search.highlight_prev();
            return;
        }
        match store.app.current_view {
            View::Markets => self.table.select_prev(),
            View::CoinDetail => {
                if let Some(detail) = &mut self.coin_detail {
                    detail.select_prev_news();
                }
            }
            View::Themes => self.themes.select_prev(),
            View::ThemeDetail => {
                if let Some(detail) = &mut self.theme_detail {
                    detail.select_prev();
                }
            }
            View::News => self.news.select_prev(),
            View::NewsDetail => {
                if let Some(detail) = &mut self.news_detail {
                    detail.scroll_up();
                }
            }
        }
    }

    fn scroll_down(&mut self, store: &Store) {
        if store.app.input_mode == InputMode::Search {
            self.search.highlight_next();
            return;
        }
        match store.app.current_view {
            View::Markets => self.table.select_next(),
            View::CoinDetail => {
                if let Some(detail) = &mut self.coin_detail {
                    detail.select_next_news();
                }
            }
            View::Themes => self.themes.select_next(),
            View::ThemeDetail => {
                if let Some(detail) = &mut self.theme_detail {
                    detail.select_next();
                }
            }
            View::News => self.news.select_next(),
            View::NewsDetail => {
                if let Some(detail) = &mut self.news_detail {
                    detail.scroll_down();
                }
            }
        }
    }

    fn go_to_top(&mut self, view: View) {
        match view {
            View::Markets => self.table.select_first(),
            View::Themes => self.themes.select_first(),
            View::News => self.news.select_first(),
            View::NewsDetail => {
                if let Some(detail) = &mut self.news_detail {
                    detail.scroll_top();
                }
            }
            View::CoinDetail | View::ThemeDetail => {}
        }
    }

    fn go_to_bottom(&mut self, view: View) {
        match view {
            View::Markets => self.table.select_last(),
            View::Themes => self.themes.select_last(),
            View::News => self.news.select_last(),
            View::CoinDetail | View::ThemeDetail | View::NewsDetail => {}
        }
    }

    fn next_page(&mut self, view: View) -> bool {
        let handle = match view {
            View::Markets => self.table.next_page(),
            View::ThemeDetail => self.theme_detail.as_mut().and_then(|d| d.next_page()),
            View::News => self.news.next_page(),
            _ => None,
        };
        handle.is_some()
    }

    fn prev_page(&mut self, view: View) -> bool {
        let handle = match view {
            View::Markets => self.table.prev_page(),
            View::ThemeDetail => self.theme_detail.as_mut().and_then(|d| d.prev_page()),
            View::News => self.news.prev_page(),
            _ => None,
        };
        handle.is_some()
    }

    fn toggle_favorite(&mut self, store: &mut Store) {
        let toggled = match store.app.current_view {
            View::Markets => self
                .table
                .toggle_favorite()
                .map(|(coin, now)| (coin.name, now)),
            View::CoinDetail => self.coin_detail.as_ref().map(|detail| {
                let name = detail
                    .coin()
                    .data()
                    .map_or_else(|| detail.coin_id().to_string(), |c| c.name.clone());
                (name, detail.toggle_favorite())
            }),
            View::ThemeDetail => self
                .theme_detail
                .as_ref()
                .and_then(|detail| detail.toggle_favorite()),
            _ => None,
        };

        if let Some((name, now_favorite)) = toggled {
            let message = if now_favorite {
                format!("Added {name} to favorites")
            } else {
                format!("Removed {name} from favorites")
            };
            store.app.notify(Notification::success(message));
        }
    }

    fn refresh(&mut self, view: View) {
        info!(?view, "refresh");
        match view {
            View::Markets => {
                self.overview.refresh();
                self.trending.refresh();
                self.latest_news.refresh();
                self.table.refresh();
            }
            View::CoinDetail => {
                if let Some(detail) = &self.coin_detail {
                    detail.refresh();
                }
            }
            View::Themes => {
                self.themes.refresh();
            }
            View::ThemeDetail => {
                if let Some(detail) = &self.theme_detail {
                    detail.refresh();
                }
            }
            View::News => {
                self.news.refresh();
            }
            View::NewsDetail => {
                if let Some(detail) = &self.news_detail {
                    detail.refresh();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MarketOverview, MockMarketApi};
    use crate::views::testing::{coin, context, news, page};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn home_api() -> MockMarketApi {
        let mut api = MockMarketApi::new();
        api.expect_market_overview()
            .returning(|| Ok(MarketOverview::default()));
        api.expect_top_gainers().returning(|_| Ok(Vec::new()));
        api.expect_recent_news().returning(|_| Ok(Vec::new()));
        api.expect_list_cryptocurrencies()
            .returning(|_, _| Ok(page(vec![coin("bitcoin", 1), coin("ethereum", 2)], 0, 1, 50)));
        api
    }

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx)
    }

    /// Let spawned fetches finish; paused time only advances once every task is idle.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_opens_coin_and_back_drops_it() {
        let mut api = home_api();
        api.expect_get_cryptocurrency()
            .returning(|id| Ok(coin(id, 2)));
        api.expect_price_history().returning(|_, _, _| Ok(Vec::new()));
        api.expect_news_by_crypto()
            .returning(|_, _, _| Ok(page(Vec::new(), 0, 0, 5)));

        let mut store = store();
        let mut screens = Screens::new(context(api));
        screens.start(&store);
        settle().await;
        assert!(screens.table.is_mounted());

        screens.apply(&mut store, Action::ScrollDown);
        screens.apply(&mut store, Action::Select);
        settle().await;

        assert_eq!(store.app.current_view, View::CoinDetail);
        assert!(!screens.table.is_mounted());
        let detail = screens.coin_detail.as_ref().unwrap();
        assert_eq!(detail.coin_id(), "ethereum");
        assert_eq!(detail.coin().data().unwrap().market_cap_rank, Some(2));

        screens.apply(&mut store, Action::Back);
        assert_eq!(store.app.current_view, View::Markets);
        assert!(screens.coin_detail.is_none());
        assert!(screens.table.is_mounted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_kept_while_in_history() {
        let mut api = home_api();
        api.expect_get_cryptocurrency()
            .returning(|id| Ok(coin(id, 1)));
        api.expect_price_history().returning(|_, _, _| Ok(Vec::new()));
        api.expect_news_by_crypto()
            .returning(|_, _, _| Ok(page(vec![news(3, "Halving")], 0, 1, 5)));
        api.expect_get_news().returning(|id| Ok(news(id, "Halving")));
        api.expect_list_news()
            .returning(|_, _| Ok(page(Vec::new(), 0, 0, 20)));

        let mut store = store();
        let mut screens = Screens::new(context(api));
        screens.start(&store);
        settle().await;

        screens.apply(&mut store, Action::Select);
        settle().await;
        screens.apply(&mut store, Action::Select);
        settle().await;

        assert_eq!(store.app.current_view, View::NewsDetail);
        assert!(screens.coin_detail.is_some());
        assert_eq!(screens.news_detail.as_ref().unwrap().id(), 3);

        screens.apply(&mut store, Action::Back);
        assert_eq!(store.app.current_view, View::CoinDetail);
        assert!(screens.news_detail.is_none());
        assert!(screens.coin_detail.is_some());

        // Switching tabs clears the history.
        screens.apply(&mut store, Action::SetView(View::News));
        assert!(screens.coin_detail.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_reports_failed_panel() {
        let mut api = MockMarketApi::new();
        api.expect_market_overview()
            .returning(|| Err(crate::Error::network("connection refused")));
        api.expect_top_gainers().returning(|_| Ok(Vec::new()));
        api.expect_recent_news().returning(|_| Ok(Vec::new()));
        api.expect_list_cryptocurrencies()
            .returning(|_, _| Ok(page(Vec::new(), 0, 0, 50)));

        let store = store();
        let mut screens = Screens::new(context(api));
        screens.start(&store);
        settle().await;

        assert!(!screens.is_loading(View::Markets));
        assert_eq!(
            screens.error(View::Markets).as_deref(),
            Some("Could not reach the server")
        );
        assert_eq!(screens.error(View::Themes), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_favorite_toggle_notifies() {
        let mut store = store();
        let mut screens = Screens::new(context(home_api()));
        screens.start(&store);
        settle().await;

        screens.apply(&mut store, Action::ToggleFavorite);
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.message.as_str()),
            Some("Added bitcoin to favorites")
        );
        assert!(screens.table.is_favorite("bitcoin"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_submit_opens_highlighted_coin() {
        let mut api = home_api();
        api.expect_search_cryptocurrencies()
            .returning(|_| Ok(vec![coin("solana", 5)]));
        api.expect_get_cryptocurrency()
            .returning(|id| Ok(coin(id, 5)));
        api.expect_price_history().returning(|_, _, _| Ok(Vec::new()));
        api.expect_news_by_crypto()
            .returning(|_, _, _| Ok(page(Vec::new(), 0, 0, 5)));

        let mut store = store();
        let mut screens = Screens::new(context(api));
        screens.start(&store);

        screens.apply(&mut store, Action::SetInputMode(InputMode::Search));
        for c in "sol".chars() {
            screens.apply(&mut store, Action::InputChar(c));
        }
        // Nothing highlighted yet, so Enter searches immediately.
        screens.apply(&mut store, Action::SubmitInput);
        settle().await;
        assert_eq!(store.app.input_mode, InputMode::Search);

        screens.apply(&mut store, Action::ScrollDown);
        screens.apply(&mut store, Action::SubmitInput);
        assert_eq!(store.app.input_mode, InputMode::Normal);
        assert_eq!(store.app.current_view, View::CoinDetail);
        assert_eq!(screens.coin_detail.as_ref().unwrap().coin_id(), "solana");
        assert_eq!(screens.search.input(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_from_article_replaces_earlier_coin() {
        let mut api = home_api();
        api.expect_get_cryptocurrency()
            .returning(|id| Ok(coin(id, 1)));
        api.expect_price_history().returning(|_, _, _| Ok(Vec::new()));
        api.expect_news_by_crypto()
            .returning(|_, _, _| Ok(page(vec![news(3, "Halving")], 0, 1, 5)));
        api.expect_get_news().returning(|id| Ok(news(id, "Halving")));
        api.expect_search_cryptocurrencies()
            .returning(|_| Ok(vec![coin("solana", 5)]));

        let mut store = store();
        let mut screens = Screens::new(context(api));
        screens.start(&store);
        settle().await;

        // Markets -> bitcoin -> article
        screens.apply(&mut store, Action::Select);
        settle().await;
        screens.apply(&mut store, Action::Select);
        settle().await;
        assert_eq!(store.app.current_view, View::NewsDetail);

        screens.apply(&mut store, Action::SetInputMode(InputMode::Search));
        for c in "sol".chars() {
            screens.apply(&mut store, Action::InputChar(c));
        }
        screens.apply(&mut store, Action::SubmitInput);
        settle().await;
        screens.apply(&mut store, Action::ScrollDown);
        screens.apply(&mut store, Action::SubmitInput);

        assert_eq!(store.app.current_view, View::CoinDetail);
        assert_eq!(store.app.history, vec![View::Markets]);
        assert_eq!(screens.coin_detail.as_ref().unwrap().coin_id(), "solana");
        assert!(screens.news_detail.is_none());

        screens.apply(&mut store, Action::Back);
        assert_eq!(store.app.current_view, View::Markets);
        assert!(screens.coin_detail.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_news_search_round_trip() {
        let mut api = home_api();
        api.expect_list_news()
            .returning(|_, _| Ok(page(vec![news(1, "a")], 0, 1, 20)));
        api.expect_search_news()
            .returning(|_, _, _| Ok(page(vec![news(2, "b")], 0, 1, 20)));

        let mut store = store();
        let mut screens = Screens::new(context(api));
        screens.apply(&mut store, Action::SetView(View::News));
        settle().await;

        store.reduce(&Action::SetInputMode(InputMode::NewsSearch));
        screens.apply(&mut store, Action::InputChar('b'));
        screens.apply(&mut store, Action::SubmitInput);
        settle().await;

        assert_eq!(store.app.input_mode, InputMode::Normal);
        assert_eq!(screens.news.selected_id(), Some(2));

        screens.apply(&mut store, Action::ClearNewsSearch);
        settle().await;
        assert_eq!(screens.news.selected_id(), Some(1));
    }
}
