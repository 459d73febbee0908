//! HTTP client for the CryptoGuide backend.

use super::{
    CryptoNews, Cryptocurrency, MarketApi, MarketOverview, PageResponse, PriceHistory,
    PriceInterval, Theme,
};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Version prefix shared by every resource path.
const API_VERSION: &str = "v1";

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    config: ApiConfig,
}

impl ApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        ApiClient::new(self.config)
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed client for the CryptoGuide REST API.
///
/// Failed calls are logged and returned; nothing is retried here.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            Error::config(format!("invalid API base URL {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "API base URL {:?} cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// Create a builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL for a versioned resource path.
    ///
    /// Segments are percent-encoded, so ids and slugs can't escape the path.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(segments)?;
        self.request(url, query).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %url.path()))]
    async fn request<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(path = url.path(), timeout = e.is_timeout(), error = %e, "API request failed");
                Error::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                path = url.path(),
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "API request returned an error status"
            );
            return Err(Error::http(status.as_u16()));
        }

        let body = response.json::<T>().await.map_err(|e| {
            tracing::warn!(path = url.path(), error = %e, "API response could not be decoded");
            Error::decode(e.to_string())
        })?;

        tracing::debug!(duration_ms = start.elapsed().as_millis() as u64, "API request succeeded");
        Ok(body)
    }
}

fn page_query(page: u32, size: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("size", size.to_string())]
}

#[async_trait]
impl MarketApi for ApiClient {
    async fn list_cryptocurrencies(
        &self,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Cryptocurrency>> {
        self.get(&["cryptocurrencies"], &page_query(page, size)).await
    }

    async fn get_cryptocurrency(&self, coin_id: &str) -> Result<Cryptocurrency> {
        self.get(&["cryptocurrencies", coin_id], &[]).await
    }

    async fn search_cryptocurrencies(&self, query: &str) -> Result<Vec<Cryptocurrency>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.get(
            &["cryptocurrencies", "search"],
            &[("query", query.to_string())],
        )
        .await
    }

    async fn list_by_theme(
        &self,
        slug: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Cryptocurrency>> {
        self.get(&["cryptocurrencies", "theme", slug], &page_query(page, size))
            .await
    }

    async fn top_gainers(&self, limit: u32) -> Result<Vec<Cryptocurrency>> {
        self.get(
            &["cryptocurrencies", "top-gainers"],
            &[("limit", limit.to_string())],
        )
        .await
    }

    async fn top_losers(&self, limit: u32) -> Result<Vec<Cryptocurrency>> {
        self.get(
            &["cryptocurrencies", "top-losers"],
            &[("limit", limit.to_string())],
        )
        .await
    }

    async fn top_volume(&self, limit: u32) -> Result<Vec<Cryptocurrency>> {
        self.get(
            &["cryptocurrencies", "top-volume"],
            &[("limit", limit.to_string())],
        )
        .await
    }

    async fn market_overview(&self) -> Result<MarketOverview> {
        self.get(&["cryptocurrencies", "market-overview"], &[]).await
    }

    async fn price_history(
        &self,
        coin_id: &str,
        interval: PriceInterval,
        hours: u32,
    ) -> Result<Vec<PriceHistory>> {
        self.get(
            &["cryptocurrencies", coin_id, "price-history"],
            &[
                ("interval", interval.as_str().to_string()),
                ("hours", hours.to_string()),
            ],
        )
        .await
    }

    async fn list_themes(&self) -> Result<Vec<Theme>> {
        self.get(&["themes"], &[]).await
    }

    async fn list_themes_with_count(&self) -> Result<Vec<Theme>> {
        self.get(&["themes", "with-count"], &[]).await
    }

    async fn get_theme(&self, slug: &str) -> Result<Theme> {
        self.get(&["themes", slug], &[]).await
    }

    async fn list_news(&self, page: u32, size: u32) -> Result<PageResponse<CryptoNews>> {
        self.get(&["news"], &page_query(page, size)).await
    }

    async fn get_news(&self, id: i64) -> Result<CryptoNews> {
        let id = id.to_string();
        self.get(&["news", id.as_str()], &[]).await
    }

    async fn news_by_crypto(
        &self,
        coin_id: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<CryptoNews>> {
        self.get(&["news", "crypto", coin_id], &page_query(page, size))
            .await
    }

    async fn news_by_theme(
        &self,
        slug: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<CryptoNews>> {
        self.get(&["news", "theme", slug], &page_query(page, size))
            .await
    }

    async fn recent_news(&self, hours: u32) -> Result<Vec<CryptoNews>> {
        self.get(&["news", "recent"], &[("hours", hours.to_string())])
            .await
    }

    async fn search_news(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<CryptoNews>> {
        let mut query = vec![("keyword", keyword.trim().to_string())];
        query.extend(page_query(page, size));
        self.get(&["news", "search"], &query).await
    }
}
