//! CryptoGuide backend API integration.
//!
//! This module provides a typed client over the backend REST endpoints and
//! the [`MarketApi`] trait the views are written against.

mod client;
mod types;

pub use client::{ApiClient, ApiClientBuilder};
pub use types::{
    CryptoNews, Cryptocurrency, MarketOverview, PageResponse, PriceHistory, PriceInterval, Theme,
    Timeframe,
};

use crate::error::Result;
use async_trait::async_trait;

/// Default page size for the full cryptocurrency listing.
pub const DEFAULT_LIST_SIZE: u32 = 100;
/// Default page size for theme listings.
pub const DEFAULT_THEME_LIST_SIZE: u32 = 50;
/// Default page size for news listings.
pub const DEFAULT_NEWS_SIZE: u32 = 20;
/// Default limit for the top gainer/loser/volume lists.
pub const DEFAULT_TOP_LIMIT: u32 = 10;
/// Default lookback for recent news.
pub const DEFAULT_RECENT_HOURS: u32 = 24;

/// Operations offered by the CryptoGuide backend.
///
/// Views depend on this trait rather than on [`ApiClient`] so they can be
/// driven by mocks in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// One page of all cryptocurrencies, ordered by market cap rank.
    async fn list_cryptocurrencies(&self, page: u32, size: u32)
    -> Result<PageResponse<Cryptocurrency>>;

    /// A single cryptocurrency by coin identifier.
    async fn get_cryptocurrency(&self, coin_id: &str) -> Result<Cryptocurrency>;

    /// Free-text search over names and symbols.
    ///
    /// A blank query returns an empty list without touching the network.
    async fn search_cryptocurrencies(&self, query: &str) -> Result<Vec<Cryptocurrency>>;

    /// One page of the cryptocurrencies associated with a theme.
    async fn list_by_theme(
        &self,
        slug: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Cryptocurrency>>;

    async fn top_gainers(&self, limit: u32) -> Result<Vec<Cryptocurrency>>;

    async fn top_losers(&self, limit: u32) -> Result<Vec<Cryptocurrency>>;

    async fn top_volume(&self, limit: u32) -> Result<Vec<Cryptocurrency>>;

    async fn market_overview(&self) -> Result<MarketOverview>;

    async fn price_history(
        &self,
        coin_id: &str,
        interval: PriceInterval,
        hours: u32,
    ) -> Result<Vec<PriceHistory>>;

    async fn list_themes(&self) -> Result<Vec<Theme>>;

    /// Themes with `crypto_count` populated.
    async fn list_themes_with_count(&self) -> Result<Vec<Theme>>;

    async fn get_theme(&self, slug: &str) -> Result<Theme>;

    async fn list_news(&self, page: u32, size: u32) -> Result<PageResponse<CryptoNews>>;

    async fn get_news(&self, id: i64) -> Result<CryptoNews>;

    async fn news_by_crypto(
        &self,
        coin_id: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<CryptoNews>>;

    async fn news_by_theme(
        &self,
        slug: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<CryptoNews>>;

    /// News published within the last `hours`.
    async fn recent_news(&self, hours: u32) -> Result<Vec<CryptoNews>>;

    async fn search_news(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<CryptoNews>>;
}
