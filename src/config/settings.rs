//! Configuration settings for CryptoGuide.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment overrides, e.g. `CRYPTOGUIDE_API__BASE_URL`.
pub const ENV_PREFIX: &str = "CRYPTOGUIDE";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,
    /// Refresh periods for the polling views.
    pub polling: PollingConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file, then apply environment overrides.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(default_path);
        Self::load_from(&config_path)
    }

    fn load_from(path: &Path) -> crate::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path.to_path_buf())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn default_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, without the `/v1` prefix.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Refresh periods for the polling views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Single-entity and dashboard views.
    pub detail_secs: u64,
    /// Tables and listings.
    pub listing_secs: u64,
    /// Low-priority news widgets.
    pub news_secs: u64,
    /// Quiet period before a typed search query is sent.
    pub search_debounce_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            detail_secs: 30,
            listing_secs: 60,
            news_secs: 300,
            search_debounce_ms: 300,
        }
    }
}

impl PollingConfig {
    pub fn detail(&self) -> Duration {
        Duration::from_secs(self.detail_secs)
    }

    pub fn listing(&self) -> Duration {
        Duration::from_secs(self.listing_secs)
    }

    pub fn news(&self) -> Duration {
        Duration::from_secs(self.news_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Rows per page in the market table.
    pub market_page_size: u32,
    /// Items per page in the news feed.
    pub news_page_size: u32,
    /// Maximum results shown in the search popup.
    pub search_results: usize,
    /// Enable Unicode symbols.
    pub unicode_symbols: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            market_page_size: 50,
            news_page_size: 20,
            search_results: 7,
            unicode_symbols: true,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Previous page.
    pub prev_page: String,
    /// Next page.
    pub next_page: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Re-fetch the current view.
    pub refresh: String,
    /// Switch to markets view.
    pub markets: String,
    /// Switch to themes view.
    pub themes: String,
    /// Switch to news view.
    pub news: String,
    /// Open search.
    pub search: String,
    /// Toggle favorite for the selected coin.
    pub favorite: String,
    /// Cycle the chart timeframe.
    pub timeframe: String,
    /// Cycle the trending tab.
    pub trending: String,
    /// Sort keys, in `SortField` order.
    pub sort_rank: String,
    pub sort_price: String,
    pub sort_change_24h: String,
    pub sort_change_7d: String,
    pub sort_market_cap: String,
    pub sort_volume: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            prev_page: "h".to_string(),
            next_page: "l".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            markets: "1".to_string(),
            themes: "2".to_string(),
            news: "3".to_string(),
            search: "/".to_string(),
            favorite: "f".to_string(),
            timeframe: "t".to_string(),
            trending: "g".to_string(),
            sort_rank: "F1".to_string(),
            sort_price: "F2".to_string(),
            sort_change_24h: "F3".to_string(),
            sort_change_7d: "F4".to_string(),
            sort_market_cap: "F5".to_string(),
            sort_volume: "F6".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cryptoguide-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.polling.detail(), Duration::from_secs(30));
        assert_eq!(config.polling.listing(), Duration::from_secs(60));
        assert_eq!(config.polling.news(), Duration::from_secs(300));
        assert_eq!(config.polling.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.ui.search_results, 7);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Some(temp_path("missing.toml"))).unwrap();
        assert_eq!(config.ui.market_page_size, 50);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://guide.example/api\"\n[polling]\nlisting_secs = 15\n",
        )
        .unwrap();

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.api.base_url, "https://guide.example/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.polling.listing_secs, 15);
        assert_eq!(config.polling.detail_secs, 30);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.toml");
        let mut config = Config::default();
        config.ui.news_page_size = 10;
        config.save(Some(path.clone())).unwrap();

        let loaded = Config::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.ui.news_page_size, 10);

        std::fs::remove_file(path).ok();
    }
}
