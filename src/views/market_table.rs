//! Paged, sortable table of all cryptocurrencies.

use super::{Selection, ViewContext};
use crate::api::{Cryptocurrency, PageResponse};
use crate::state::{FavoritesStore, Pager, Resource, ResourceState, SortField, SortState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

type Listing = PageResponse<Cryptocurrency>;

/// The market table on the home screen.
///
/// Keyed by page index and refreshed on the listing period. Sorting is
/// applied client-side to the current page only.
pub struct MarketTable {
    resource: Resource<u32, Listing>,
    pager: Pager,
    sort: SortState,
    selection: Selection,
    favorites: FavoritesStore,
}

impl MarketTable {
    pub fn new(ctx: &ViewContext) -> Self {
        let size = ctx.ui.market_page_size;
        let fetch = ctx.fetcher(move |api, page: u32| async move {
            api.list_cryptocurrencies(page, size).await
        });

        Self {
            resource: Resource::new("market_table", 0, fetch).with_interval(ctx.polling.listing()),
            pager: Pager::new(size),
            sort: SortState::default(),
            selection: Selection::default(),
            favorites: ctx.favorites.clone(),
        }
    }

    pub fn mount(&mut self) -> JoinHandle<()> {
        self.resource.mount()
    }

    pub fn unmount(&mut self) {
        self.resource.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.resource.is_mounted()
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        self.resource.refetch()
    }

    pub fn state(&self) -> watch::Ref<'_, ResourceState<Listing>> {
        self.resource.state()
    }

    /// Pull page totals from the latest response and keep the cursor valid.
    pub fn sync(&mut self) {
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

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    pub fn next_page(&mut self) -> Option<JoinHandle<()>> {
        self.sync();
        if !self.pager.next() {
            return None;
        }
        self.selection.top();
        self.resource.set_deps(self.pager.page)
    }

    pub fn prev_page(&mut self) -> Option<JoinHandle<()>> {
        self.sync();
        if !self.pager.prev() {
            return None;
        }
        self.selection.top();
        self.resource.set_deps(self.pager.page)
    }

    /// Rows of the current page in display order.
    pub fn rows(&self) -> Vec<Cryptocurrency> {
        let state = self.resource.state();
        state
            .data()
            .map(|listing| {
                self.sort
                    .apply(&listing.content)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let len = self
            .resource
            .state()
            .data()
            .map_or(0, |listing| listing.content.len());
        self.selection.get(len)
    }

    pub fn selected(&self) -> Option<Cryptocurrency> {
        let index = self.selected_index()?;
        self.rows().into_iter().nth(index)
    }

    pub fn select_next(&mut self) {
        let len = self.rows().len();
        self.selection.down(len);
    }

    pub fn select_prev(&mut self) {
        self.selection.up();
    }

    pub fn select_first(&mut self) {
        self.selection.top();
    }

    pub fn select_last(&mut self) {
        let len = self.rows().len();
        self.selection.bottom(len);
    }

    pub fn is_favorite(&self, coin_id: &str) -> bool {
        self.favorites.is_favorite(coin_id)
    }

    /// Toggle the selected coin. Returns the coin and its new favorite status.
    pub fn toggle_favorite(&self) -> Option<(Cryptocurrency, bool)> {
        let coin = self.selected()?;
        let now_favorite = self.favorites.toggle(&coin.coin_id);
        Some((coin, now_favorite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketApi;
    use crate::views::testing::{coin, context, page};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn ids(rows: &[Cryptocurrency]) -> Vec<&str> {
        rows.iter().map(|c| c.coin_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_mount_fetches_first_page() {
        let mut api = MockMarketApi::new();
        api.expect_list_cryptocurrencies()
            .with(eq(0), eq(50))
            .times(1)
            .returning(|_, _| Ok(page(vec![coin("bitcoin", 1), coin("ethereum", 2)], 0, 3, 50)));

        let mut table = MarketTable::new(&context(api));
        table.mount().await.unwrap();
        table.sync();

        assert_eq!(ids(&table.rows()), vec!["bitcoin", "ethereum"]);
        assert_eq!(table.pager().total_pages, 3);
        assert_eq!(table.selected().unwrap().coin_id, "bitcoin");
    }

    #[tokio::test]
    async fn test_paging_fetches_each_page_once() {
        let mut api = MockMarketApi::new();
        api.expect_list_cryptocurrencies()
            .with(eq(0), eq(50))
            .times(2)
            .returning(|_, _| Ok(page(vec![coin("bitcoin", 1)], 0, 2, 50)));
        api.expect_list_cryptocurrencies()
            .with(eq(1), eq(50))
            .times(1)
            .returning(|_, _| Ok(page(vec![coin("tron", 51)], 1, 2, 50)));

        let mut table = MarketTable::new(&context(api));
        table.mount().await.unwrap();

        table.next_page().unwrap().await.unwrap();
        assert_eq!(table.pager().page, 1);
        assert_eq!(ids(&table.rows()), vec!["tron"]);

        // Already on the last page.
        assert!(table.next_page().is_none());

        table.prev_page().unwrap().await.unwrap();
        assert_eq!(table.pager().page, 0);
        assert!(table.prev_page().is_none());
    }

    #[tokio::test]
    async fn test_sort_reorders_rows_and_selection() {
        let mut api = MockMarketApi::new();
        api.expect_list_cryptocurrencies().returning(|_, _| {
            Ok(page(
                vec![coin("bitcoin", 1), coin("ethereum", 2), coin("tether", 3)],
                0,
                1,
                50,
            ))
        });

        let mut table = MarketTable::new(&context(api));
        table.mount().await.unwrap();

        table.sort_by(SortField::Rank);
        assert_eq!(ids(&table.rows()), vec!["tether", "ethereum", "bitcoin"]);
        assert_eq!(table.selected().unwrap().coin_id, "tether");

        table.select_last();
        assert_eq!(table.selected().unwrap().coin_id, "bitcoin");
    }

    #[tokio::test]
    async fn test_toggle_favorite_is_shared() {
        let mut api = MockMarketApi::new();
        api.expect_list_cryptocurrencies()
            .returning(|_, _| Ok(page(vec![coin("solana", 5)], 0, 1, 50)));

        let ctx = context(api);
        let favorites = ctx.favorites.clone();
        let mut table = MarketTable::new(&ctx);
        table.mount().await.unwrap();

        let (coin, now_favorite) = table.toggle_favorite().unwrap();
        assert_eq!(coin.coin_id, "solana");
        assert!(now_favorite);
        assert!(favorites.is_favorite("solana"));
        assert!(table.is_favorite("solana"));
    }

    #[tokio::test]
    async fn test_failed_load_shows_error_without_rows() {
        let mut api = MockMarketApi::new();
        api.expect_list_cryptocurrencies()
            .returning(|_, _| Err(crate::Error::http(503)));

        let mut table = MarketTable::new(&context(api));
        table.mount().await.unwrap();

        assert!(table.rows().is_empty());
        assert!(table.selected().is_none());
        assert_eq!(table.state().error.as_deref(), Some("Server error (503)"));
    }
}
