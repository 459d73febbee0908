//! News feed with search, and the single-article reader.

use super::{Selection, ViewContext};
use crate::api::{CryptoNews, PageResponse};
use crate::state::{Pager, Resource, ResourceState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lookback for the "more news" list under an article.
pub const RELATED_ARTICLES_HOURS: u32 = 48;
/// Articles listed under the one being read.
pub const RELATED_ARTICLES_COUNT: usize = 5;

/// Page and optional search term the feed is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsQuery {
    pub page: u32,
    pub search: Option<String>,
}

/// Paged list of published articles.
///
/// The search box edits a draft; the feed only changes on submit, which
/// always returns to the first page.
pub struct NewsFeed {
    resource: Resource<NewsQuery, PageResponse<CryptoNews>>,
    pager: Pager,
    selection: Selection,
    draft: String,
}

impl NewsFeed {
    pub fn new(ctx: &ViewContext) -> Self {
        let size = ctx.ui.news_page_size;
        let fetch = ctx.fetcher(move |api, query: NewsQuery| async move {
            match query.search {
                Some(term) => api.search_news(&term, query.page, size).await,
                None => api.list_news(query.page, size).await,
            }
        });

        Self {
            resource: Resource::new("news_feed", NewsQuery::default(), fetch),
            pager: Pager::new(size),
            selection: Selection::default(),
            draft: String::new(),
        }
    }

    pub fn mount(&mut self) -> JoinHandle<()> {
        self.resource.mount()
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        self.resource.refetch()
    }

    pub fn state(&self) -> watch::Ref<'_, ResourceState<PageResponse<CryptoNews>>> {
        self.resource.state()
    }

    pub fn query(&self) -> NewsQuery {
        self.resource.deps()
    }

    /// The search term the list is filtered by, if any.
    pub fn active_search(&self) -> Option<String> {
        self.query().search
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_char(&mut self) {
        self.draft.pop();
    }

    /// Apply the draft as the search term. A blank draft clears the search.
    pub fn submit_search(&mut self) -> Option<JoinHandle<()>> {
        let term = self.draft.trim().to_string();
        if term.is_empty() {
            return self.clear_search();
        }
        self.reload(NewsQuery {
            page: 0,
            search: Some(term),
        })
    }

    pub fn clear_search(&mut self) -> Option<JoinHandle<()>> {
        self.draft.clear();
        self.reload(NewsQuery::default())
    }

    /// Take totals from the loaded page. Data still on screen from a
    /// previous query is ignored.
    pub fn sync(&mut self) {
        if !self.resource.is_current() {
            return;
        }
        let len = {
            let state = self.resource.state();
            let Some(listing) = state.data() else {
                return;
            };
            self.pager.sync(listing);
            listing.content.len()
        };
        self.selection.clamp(len);
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn next_page(&mut self) -> Option<JoinHandle<()>> {
        self.sync();
        if !self.pager.next() {
            return None;
        }
        let search = self.active_search();
        self.goto(NewsQuery {
            page: self.pager.page,
            search,
        })
    }

    pub fn prev_page(&mut self) -> Option<JoinHandle<()>> {
        self.sync();
        if !self.pager.prev() {
            return None;
        }
        let search = self.active_search();
        self.goto(NewsQuery {
            page: self.pager.page,
            search,
        })
    }

    /// Start a different query. Paging stays disabled until its first page arrives.
    fn reload(&mut self, query: NewsQuery) -> Option<JoinHandle<()>> {
        self.pager = Pager::new(self.pager.size);
        self.goto(query)
    }

    fn goto(&mut self, query: NewsQuery) -> Option<JoinHandle<()>> {
        self.selection.top();
        self.resource.set_deps(query)
    }

    fn len(&self) -> usize {
        self.resource
            .state()
            .data()
            .map_or(0, |listing| listing.content.len())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.get(self.len())
    }

    pub fn selected_id(&self) -> Option<i64> {
        let index = self.selected_index()?;
        let state = self.resource.state();
        state.data()?.content.get(index).map(|n| n.id)
    }

    pub fn select_next(&mut self) {
        let len = self.len();
        self.selection.down(len);
    }

    pub fn select_prev(&mut self) {
        self.selection.up();
    }

    pub fn select_first(&mut self) {
        self.selection.top();
    }

    pub fn select_last(&mut self) {
        let len = self.len();
        self.selection.bottom(len);
    }
}

/// One article. The body is line-oriented markup, see [`crate::markup`].
///
/// Below it, a few other recent articles.
pub struct NewsDetail {
    id: i64,
    resource: Resource<i64, CryptoNews>,
    related: Resource<i64, Vec<CryptoNews>>,
    scroll: u16,
}

impl NewsDetail {
    pub fn new(ctx: &ViewContext, id: i64) -> Self {
        let fetch = ctx.fetcher(|api, id: i64| async move { api.get_news(id).await });
        let related = ctx.fetcher(|api, id: i64| async move {
            let recent = api.recent_news(RELATED_ARTICLES_HOURS).await?;
            Ok(recent
                .into_iter()
                .filter(|article| article.id != id)
                .take(RELATED_ARTICLES_COUNT)
                .collect())
        });
        Self {
            id,
            resource: Resource::new("news_detail", id, fetch),
            related: Resource::new("related_articles", id, related),
            scroll: 0,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Load the article and the related list.
    pub fn mount(&mut self) -> Vec<JoinHandle<()>> {
        vec![self.resource.mount(), self.related.mount()]
    }

    pub fn refresh(&self) -> Vec<JoinHandle<()>> {
        vec![self.resource.refetch(), self.related.refetch()]
    }

    pub fn state(&self) -> watch::Ref<'_, ResourceState<CryptoNews>> {
        self.resource.state()
    }

    pub fn related(&self) -> watch::Ref<'_, ResourceState<Vec<CryptoNews>>> {
        self.related.state()
    }

    /// Article body, falling back to the summary. Empty until loaded.
    pub fn body(&self) -> String {
        let state = self.resource.state();
        state
            .data()
            .and_then(|n| n.content.clone().or_else(|| n.summary.clone()))
            .unwrap_or_default()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_top(&mut self) {
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketApi;
    use crate::markup::{self, Block};
    use crate::views::testing::{context, news, page};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mount_lists_first_page() {
        let mut api = MockMarketApi::new();
        api.expect_list_news()
            .with(eq(0), eq(20))
            .times(1)
            .returning(|_, _| Ok(page(vec![news(1, "ETF approved")], 0, 4, 20)));

        let mut feed = NewsFeed::new(&context(api));
        feed.mount().await.unwrap();
        feed.sync();

        assert_eq!(feed.selected_id(), Some(1));
        assert_eq!(feed.pager().total_pages, 4);
        assert_eq!(feed.active_search(), None);
    }

    #[tokio::test]
    async fn test_submit_search_returns_to_first_page() {
        let mut api = MockMarketApi::new();
        api.expect_list_news()
            .with(eq(0), eq(20))
            .returning(|_, _| Ok(page(vec![news(1, "a")], 0, 3, 20)));
        api.expect_list_news()
            .with(eq(1), eq(20))
            .times(1)
            .returning(|_, _| Ok(page(vec![news(21, "b")], 1, 3, 20)));
        api.expect_search_news()
            .with(eq("solana"), eq(0), eq(20))
            .times(1)
            .returning(|_, _, _| Ok(page(vec![news(99, "Solana upgrade")], 0, 1, 20)));

        let mut feed = NewsFeed::new(&context(api));
        feed.mount().await.unwrap();
        feed.next_page().unwrap().await.unwrap();
        assert_eq!(feed.query().page, 1);

        for c in " solana ".chars() {
            feed.push_char(c);
        }
        // Typing alone does not touch the feed.
        assert_eq!(feed.active_search(), None);

        feed.submit_search().unwrap().await.unwrap();
        assert_eq!(
            feed.query(),
            NewsQuery {
                page: 0,
                search: Some("solana".to_string()),
            }
        );
        assert_eq!(feed.selected_id(), Some(99));
        assert!(feed.next_page().is_none());
    }

    #[tokio::test]
    async fn test_clear_search_restores_feed() {
        let mut api = MockMarketApi::new();
        api.expect_list_news()
            .with(eq(0), eq(20))
            .times(2)
            .returning(|_, _| Ok(page(vec![news(1, "a")], 0, 1, 20)));
        api.expect_search_news()
            .times(1)
            .returning(|_, _, _| Ok(page(vec![news(5, "b")], 0, 1, 20)));

        let mut feed = NewsFeed::new(&context(api));
        feed.mount().await.unwrap();
        feed.push_char('x');
        feed.submit_search().unwrap().await.unwrap();
        assert_eq!(feed.selected_id(), Some(5));

        feed.clear_search().unwrap().await.unwrap();
        assert_eq!(feed.draft(), "");
        assert_eq!(feed.active_search(), None);
        assert_eq!(feed.selected_id(), Some(1));
    }

    #[tokio::test]
    async fn test_blank_submit_without_search_is_noop() {
        let mut api = MockMarketApi::new();
        api.expect_list_news()
            .times(1)
            .returning(|_, _| Ok(page(Vec::new(), 0, 0, 20)));

        let mut feed = NewsFeed::new(&context(api));
        feed.mount().await.unwrap();
        feed.push_char(' ');
        assert!(feed.submit_search().is_none());
    }

    #[tokio::test]
    async fn test_detail_parses_body() {
        let mut api = MockMarketApi::new();
        api.expect_get_news().with(eq(42)).times(1).returning(|id| {
            let mut article = news(id, "Weekly wrap");
            article.content = Some("## Summary\n\nPrices rose.\n- BTC up".to_string());
            Ok(article)
        });

        api.expect_recent_news()
            .returning(|_| Ok(Vec::new()));

        let mut detail = NewsDetail::new(&context(api), 42);
        for handle in detail.mount() {
            handle.await.unwrap();
        }

        assert_eq!(detail.state().data().unwrap().title, "Weekly wrap");
        let body = detail.body();
        assert_eq!(
            markup::parse(&body),
            vec![
                Block::Heading2("Summary"),
                Block::Paragraph("Prices rose."),
                Block::ListItem("BTC up"),
            ]
        );

        detail.scroll_up();
        assert_eq!(detail.scroll(), 0);
        detail.scroll_down();
        assert_eq!(detail.scroll(), 1);
    }

    #[tokio::test]
    async fn test_next_page_waits_for_search_totals() {
        let mut api = MockMarketApi::new();
        api.expect_list_news()
            .with(eq(0), eq(20))
            .times(1)
            .returning(|_, _| Ok(page(vec![news(1, "a")], 0, 50, 20)));
        api.expect_search_news()
            .with(eq("solana"), eq(0), eq(20))
            .times(1)
            .returning(|_, _, _| Ok(page(vec![news(99, "Solana upgrade")], 0, 1, 20)));

        let mut feed = NewsFeed::new(&context(api));
        feed.mount().await.unwrap();
        feed.sync();
        assert_eq!(feed.pager().total_pages, 50);

        for c in "solana".chars() {
            feed.push_char(c);
        }
        let pending = feed.submit_search().unwrap();

        // The unfiltered feed is still on screen; its totals must not drive paging.
        assert!(feed.next_page().is_none());
        assert_eq!(feed.pager().total_pages, 0);
        assert_eq!(
            feed.query(),
            NewsQuery {
                page: 0,
                search: Some("solana".to_string()),
            }
        );

        pending.await.unwrap();
        feed.sync();
        assert_eq!(feed.pager().total_pages, 1);
        assert_eq!(feed.pager().page, 0);
        assert!(feed.next_page().is_none());
    }

    #[tokio::test]
    async fn test_detail_lists_other_recent_articles() {
        let mut api = MockMarketApi::new();
        api.expect_get_news()
            .with(eq(3))
            .returning(|id| Ok(news(id, "Halving")));
        api.expect_recent_news()
            .with(eq(RELATED_ARTICLES_HOURS))
            .times(1)
            .returning(|_| Ok((1..=8).map(|id| news(id, "recent")).collect()));

        let mut detail = NewsDetail::new(&context(api), 3);
        for handle in detail.mount() {
            handle.await.unwrap();
        }

        let ids: Vec<i64> = detail
            .related()
            .data()
            .unwrap()
            .iter()
            .map(|article| article.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 6]);
    }
}
