//! Screen-level view models.
//!
//! Each view owns the [`Resource`](crate::state::Resource)s it displays and
//! exposes the small set of operations the event loop drives (paging,
//! sorting, selection). Rendering lives in [`crate::ui`].

mod coin_detail;
mod dashboard;
mod market_table;
mod news;
mod screens;
mod search;
mod themes;

pub use coin_detail::CoinDetail;
pub use dashboard::{LatestNewsPanel, MarketOverviewPanel, TrendingPanel, TrendingTab};
pub use market_table::MarketTable;
pub use news::{NewsDetail, NewsFeed, NewsQuery};
pub use screens::Screens;
pub use search::{CoinSearch, SearchOutcome};
pub use themes::{ThemeBrowser, ThemeDetail};

use crate::api::MarketApi;
use crate::config::{PollingConfig, UiConfig};
use crate::error::Result;
use crate::state::FavoritesStore;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Everything a view needs to build its resources.
#[derive(Clone)]
pub struct ViewContext {
    pub api: Arc<dyn MarketApi>,
    pub polling: PollingConfig,
    pub ui: UiConfig,
    pub favorites: FavoritesStore,
}

impl ViewContext {
    pub fn new(api: Arc<dyn MarketApi>, polling: PollingConfig, ui: UiConfig) -> Self {
        Self {
            api,
            polling,
            ui,
            favorites: FavoritesStore::in_memory(),
        }
    }

    pub fn with_favorites(mut self, favorites: FavoritesStore) -> Self {
        self.favorites = favorites;
        self
    }

    /// Adapt an async call on the API into a resource fetch function.
    pub(crate) fn fetcher<D, T, F, Fut>(
        &self,
        fetch: F,
    ) -> impl Fn(D) -> BoxFuture<'static, Result<T>> + Send + Sync + 'static
    where
        D: 'static,
        T: 'static,
        F: Fn(Arc<dyn MarketApi>, D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        move |deps| fetch(Arc::clone(&api), deps).boxed()
    }
}

/// Cursor over a list whose length can change between frames.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    /// The selected index, clamped to `len`. `None` for an empty list.
    pub fn get(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    pub fn up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
    }

    pub fn top(&mut self) {
        self.index = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.index = len.saturating_sub(1);
    }

    /// Keep the cursor inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::api::{Cryptocurrency, CryptoNews, MockMarketApi, PageResponse};

    pub fn context(api: MockMarketApi) -> ViewContext {
        ViewContext::new(Arc::new(api), PollingConfig::default(), UiConfig::default())
    }

    pub fn coin(id: &str, rank: u32) -> Cryptocurrency {
        serde_json::from_value(serde_json::json!({
            "coinId": id,
            "symbol": id.to_uppercase(),
            "name": id,
            "marketCapRank": rank,
        }))
        .unwrap()
    }

    pub fn news(id: i64, title: &str) -> CryptoNews {
        serde_json::from_value(serde_json::json!({ "id": id, "title": title })).unwrap()
    }

    pub fn page<T>(content: Vec<T>, number: u32, total_pages: u32, size: u32) -> PageResponse<T> {
        PageResponse {
            total_elements: u64::from(total_pages) * u64::from(size),
            content,
            total_pages,
            size,
            number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut selection = Selection::default();
        assert_eq!(selection.get(0), None);

        selection.up();
        assert_eq!(selection.get(3), Some(0));

        selection.down(3);
        selection.down(3);
        selection.down(3);
        assert_eq!(selection.get(3), Some(2));

        // The list shrank under the cursor.
        assert_eq!(selection.get(2), Some(1));
        selection.clamp(1);
        assert_eq!(selection.get(5), Some(0));

        selection.bottom(5);
        assert_eq!(selection.get(5), Some(4));
        selection.top();
        assert_eq!(selection.get(5), Some(0));
    }
}
