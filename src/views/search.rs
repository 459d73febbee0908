//! Header coin search: debounced lookup with a short result list.

use super::ViewContext;
use crate::api::Cryptocurrency;
use crate::state::{DebouncedSearch, ResourceState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What happened when the user pressed Enter in the search popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A result was chosen; open this coin.
    Open(String),
    /// Nothing was highlighted, so the query was sent immediately.
    Searching,
    /// Blank input.
    Nothing,
}

pub struct CoinSearch {
    search: DebouncedSearch<Vec<Cryptocurrency>>,
    highlighted: Option<usize>,
}

impl CoinSearch {
    pub fn new(ctx: &ViewContext) -> Self {
        let limit = ctx.ui.search_results;
        let fetch = ctx.fetcher(move |api, query: String| async move {
            let mut found = api.search_cryptocurrencies(&query).await?;
            found.truncate(limit);
            Ok(found)
        });

        Self {
            search: DebouncedSearch::new("coin_search", ctx.polling.search_debounce(), fetch),
            highlighted: None,
        }
    }

    pub fn input(&self) -> &str {
        self.search.input()
    }

    pub fn results(&self) -> watch::Ref<'_, ResourceState<Vec<Cryptocurrency>>> {
        self.search.results()
    }

    pub fn is_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn push_char(&mut self, c: char) {
        self.highlighted = None;
        self.search.push_char(c);
    }

    pub fn pop_char(&mut self) {
        self.highlighted = None;
        self.search.pop_char();
    }

    fn len(&self) -> usize {
        self.search.results().data().map_or(0, Vec::len)
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted.filter(|&index| index < self.len())
    }

    /// Move the highlight down, wrapping to the first result.
    pub fn highlight_next(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted() {
            Some(index) => (index + 1) % len,
            None => 0,
        });
    }

    /// Move the highlight up, wrapping to the last result.
    pub fn highlight_prev(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted() {
            Some(0) | None => len - 1,
            Some(index) => index - 1,
        });
    }

    /// Open the highlighted coin, or send the query right away.
    ///
    /// Opening a coin also empties the popup. The returned handle, when
    /// present, completes with the immediate search.
    pub fn confirm(&mut self) -> (SearchOutcome, Option<JoinHandle<()>>) {
        let chosen = self.highlighted().and_then(|index| {
            let results = self.search.results();
            results
                .data()
                .and_then(|coins| coins.get(index))
                .map(|coin| coin.coin_id.clone())
        });

        if let Some(coin_id) = chosen {
            self.reset();
            return (SearchOutcome::Open(coin_id), None);
        }

        match self.search.submit() {
            Some(handle) => (SearchOutcome::Searching, Some(handle)),
            None => (SearchOutcome::Nothing, None),
        }
    }

    pub fn reset(&mut self) {
        self.highlighted = None;
        self.search.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketApi;
    use crate::views::testing::{coin, context};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn many(count: u32) -> Vec<Cryptocurrency> {
        (1..=count).map(|rank| coin(&format!("coin-{rank}"), rank)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_are_capped() {
        let mut api = MockMarketApi::new();
        api.expect_search_cryptocurrencies()
            .with(eq("coin"))
            .times(1)
            .returning(|_| Ok(many(12)));

        let mut search = CoinSearch::new(&context(api));
        for c in "coin".chars() {
            search.push_char(c);
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(search.results().data().map(Vec::len), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_never_queries() {
        let api = MockMarketApi::new();
        let mut search = CoinSearch::new(&context(api));

        search.push_char(' ');
        tokio::time::sleep(Duration::from_secs(1)).await;
        let (outcome, handle) = search.confirm();

        assert_eq!(outcome, SearchOutcome::Nothing);
        assert!(handle.is_none());
        assert!(search.results().data().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_without_highlight_searches_now() {
        let mut api = MockMarketApi::new();
        api.expect_search_cryptocurrencies()
            .with(eq("eth"))
            .times(1)
            .returning(|_| Ok(many(2)));

        let mut search = CoinSearch::new(&context(api));
        for c in "eth".chars() {
            search.push_char(c);
        }
        let (outcome, handle) = search.confirm();
        assert_eq!(outcome, SearchOutcome::Searching);
        handle.unwrap().await.unwrap();

        // The debounce was cancelled by the submit.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(search.results().data().map(Vec::len), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_wraps_and_opens() {
        let mut api = MockMarketApi::new();
        api.expect_search_cryptocurrencies()
            .returning(|_| Ok(many(3)));

        let mut search = CoinSearch::new(&context(api));
        search.push_char('c');
        search.confirm().1.unwrap().await.unwrap();

        search.highlight_prev();
        assert_eq!(search.highlighted(), Some(2));
        search.highlight_next();
        assert_eq!(search.highlighted(), Some(0));
        search.highlight_next();

        let (outcome, handle) = search.confirm();
        assert_eq!(outcome, SearchOutcome::Open("coin-2".to_string()));
        assert!(handle.is_none());
        assert_eq!(search.input(), "");
        assert_eq!(search.highlighted(), None);
    }
}
