//! Theme list and per-theme coin listing.

use super::{Selection, ViewContext};
use crate::api::{Cryptocurrency, DEFAULT_THEME_LIST_SIZE, PageResponse, Theme};
use crate::state::{FavoritesStore, Pager, Resource, ResourceState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// All themes with their coin counts.
pub struct ThemeBrowser {
    resource: Resource<(), Vec<Theme>>,
    selection: Selection,
}

impl ThemeBrowser {
    pub fn new(ctx: &ViewContext) -> Self {
        let fetch = ctx.fetcher(|api, ()| async move { api.list_themes_with_count().await });
        Self {
            resource: Resource::new("themes", (), fetch),
            selection: Selection::default(),
        }
    }

    pub fn mount(&mut self) -> JoinHandle<()> {
        self.resource.mount()
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        self.resource.refetch()
    }

    pub fn state(&self) -> watch::Ref<'_, ResourceState<Vec<Theme>>> {
        self.resource.state()
    }

    fn len(&self) -> usize {
        self.resource.state().data().map_or(0, Vec::len)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.get(self.len())
    }

    pub fn selected_slug(&self) -> Option<String> {
        let index = self.selected_index()?;
        let state = self.resource.state();
        state.data()?.get(index).map(|theme| theme.slug.clone())
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

/// One theme: its header and a paged list of member coins.
pub struct ThemeDetail {
    slug: String,
    theme: Resource<String, Theme>,
    coins: Resource<(String, u32), PageResponse<Cryptocurrency>>,
    pager: Pager,
    selection: Selection,
    favorites: FavoritesStore,
}

impl ThemeDetail {
    pub fn new(ctx: &ViewContext, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        let theme = ctx.fetcher(|api, slug: String| async move { api.get_theme(&slug).await });
        let coins = ctx.fetcher(|api, (slug, page): (String, u32)| async move {
            api.list_by_theme(&slug, page, DEFAULT_THEME_LIST_SIZE).await
        });

        Self {
            theme: Resource::new("theme", slug.clone(), theme),
            coins: Resource::new("theme_coins", (slug.clone(), 0), coins)
                .with_interval(ctx.polling.listing()),
            pager: Pager::new(DEFAULT_THEME_LIST_SIZE),
            selection: Selection::default(),
            favorites: ctx.favorites.clone(),
            slug,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn mount(&mut self) -> Vec<JoinHandle<()>> {
        vec![self.theme.mount(), self.coins.mount()]
    }

    pub fn unmount(&mut self) {
        self.theme.unmount();
        self.coins.unmount();
    }

    pub fn refresh(&self) -> Vec<JoinHandle<()>> {
        vec![self.theme.refetch(), self.coins.refetch()]
    }

    pub fn theme(&self) -> watch::Ref<'_, ResourceState<Theme>> {
        self.theme.state()
    }

    pub fn coins(&self) -> watch::Ref<'_, ResourceState<PageResponse<Cryptocurrency>>> {
        self.coins.state()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn sync(&mut self) {
        let len = {
            let state = self.coins.state();
            let Some(listing) = state.data() else {
                return;
            };
            self.pager.sync(listing);
            listing.content.len()
        };
        self.selection.clamp(len);
    }

    pub fn next_page(&mut self) -> Option<JoinHandle<()>> {
        self.sync();
        if !self.pager.next() {
            return None;
        }
        self.selection.top();
        self.coins.set_deps((self.slug.clone(), self.pager.page))
    }

    pub fn prev_page(&mut self) -> Option<JoinHandle<()>> {
        self.sync();
        if !self.pager.prev() {
            return None;
        }
        self.selection.top();
        self.coins.set_deps((self.slug.clone(), self.pager.page))
    }

    fn len(&self) -> usize {
        self.coins
            .state()
            .data()
            .map_or(0, |listing| listing.content.len())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.get(self.len())
    }

    pub fn selected_coin_id(&self) -> Option<String> {
        let index = self.selected_index()?;
        let state = self.coins.state();
        state
            .data()?
            .content
            .get(index)
            .map(|coin| coin.coin_id.clone())
    }

    pub fn select_next(&mut self) {
        let len = self.len();
        self.selection.down(len);
    }

    pub fn select_prev(&mut self) {
        self.selection.up();
    }

    pub fn is_favorite(&self, coin_id: &str) -> bool {
        self.favorites.is_favorite(coin_id)
    }

    /// Toggle the selected coin. Returns its id and new favorite status.
    pub fn toggle_favorite(&self) -> Option<(String, bool)> {
        let coin_id = self.selected_coin_id()?;
        let now_favorite = self.favorites.toggle(&coin_id);
        Some((coin_id, now_favorite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketApi;
    use crate::views::testing::{coin, context, page};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn theme(slug: &str, count: u64) -> Theme {
        Theme {
            id: None,
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            description: None,
            color: None,
            icon_url: None,
            crypto_count: Some(count),
        }
    }

    #[tokio::test]
    async fn test_browser_selects_slug() {
        let mut api = MockMarketApi::new();
        api.expect_list_themes_with_count()
            .times(1)
            .returning(|| Ok(vec![theme("layer-1", 12), theme("defi", 30)]));

        let mut browser = ThemeBrowser::new(&context(api));
        assert_eq!(browser.selected_slug(), None);

        browser.mount().await.unwrap();
        assert_eq!(browser.selected_slug().as_deref(), Some("layer-1"));
        browser.select_last();
        assert_eq!(browser.selected_slug().as_deref(), Some("defi"));
    }

    #[tokio::test]
    async fn test_detail_pages_through_theme_coins() {
        let mut api = MockMarketApi::new();
        api.expect_get_theme()
            .with(eq("defi"))
            .times(1)
            .returning(|slug| Ok(theme(slug, 60)));
        api.expect_list_by_theme()
            .with(eq("defi"), eq(0), eq(DEFAULT_THEME_LIST_SIZE))
            .times(1)
            .returning(|_, _, _| Ok(page(vec![coin("uniswap", 20)], 0, 2, 50)));
        api.expect_list_by_theme()
            .with(eq("defi"), eq(1), eq(DEFAULT_THEME_LIST_SIZE))
            .times(1)
            .returning(|_, _, _| Ok(page(vec![coin("aave", 60)], 1, 2, 50)));

        let mut detail = ThemeDetail::new(&context(api), "defi");
        for handle in detail.mount() {
            handle.await.unwrap();
        }
        assert_eq!(detail.theme().data().unwrap().crypto_count, Some(60));
        assert_eq!(detail.selected_coin_id().as_deref(), Some("uniswap"));

        detail.next_page().unwrap().await.unwrap();
        assert_eq!(detail.selected_coin_id().as_deref(), Some("aave"));
        assert!(detail.next_page().is_none());
    }

    #[tokio::test]
    async fn test_missing_theme_reports_not_found() {
        let mut api = MockMarketApi::new();
        api.expect_get_theme()
            .returning(|_| Err(crate::Error::http(404)));
        api.expect_list_by_theme()
            .returning(|_, _, _| Err(crate::Error::http(404)));

        let mut detail = ThemeDetail::new(&context(api), "nope");
        for handle in detail.mount() {
            handle.await.unwrap();
        }
        assert_eq!(detail.theme().error.as_deref(), Some("Not found"));
        assert!(detail.toggle_favorite().is_none());
    }
}
