//! Home screen side panels: market overview, trending coins, latest news.

use super::ViewContext;
use crate::api::{CryptoNews, Cryptocurrency, DEFAULT_RECENT_HOURS, MarketOverview};
use crate::state::{Resource, ResourceState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Coins shown in the trending panel.
pub const TRENDING_LIMIT: u32 = 5;
/// Articles shown in the latest news panel.
pub const LATEST_NEWS_COUNT: usize = 5;

/// Global market figures, refreshed on the detail period.
pub struct MarketOverviewPanel {
    resource: Resource<(), MarketOverview>,
}

impl MarketOverviewPanel {
    pub fn new(ctx: &ViewContext) -> Self {
        let fetch = ctx.fetcher(|api, ()| async move { api.market_overview().await });
        Self {
            resource: Resource::new("market_overview", (), fetch)
                .with_interval(ctx.polling.detail()),
        }
    }

    pub fn mount(&mut self) -> JoinHandle<()> {
        self.resource.mount()
    }

    pub fn unmount(&mut self) {
        self.resource.unmount();
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        self.resource.refetch()
    }

    pub fn state(&self) -> watch::Ref<'_, ResourceState<MarketOverview>> {
        self.resource.state()
    }
}

/// Which ranking the trending panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingTab {
    #[default]
    Gainers,
    Losers,
    Volume,
}

impl TrendingTab {
    pub const ALL: [TrendingTab; 3] = [Self::Gainers, Self::Losers, Self::Volume];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Gainers => "Top Gainers",
            Self::Losers => "Top Losers",
            Self::Volume => "Top Volume",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Gainers => Self::Losers,
            Self::Losers => Self::Volume,
            Self::Volume => Self::Gainers,
        }
    }
}

/// Top five coins for the selected ranking, in server order.
pub struct TrendingPanel {
    resource: Resource<TrendingTab, Vec<Cryptocurrency>>,
}

impl TrendingPanel {
    pub fn new(ctx: &ViewContext) -> Self {
        let fetch = ctx.fetcher(|api, tab: TrendingTab| async move {
            match tab {
                TrendingTab::Gainers => api.top_gainers(TRENDING_LIMIT).await,
                TrendingTab::Losers => api.top_losers(TRENDING_LIMIT).await,
                TrendingTab::Volume => api.top_volume(TRENDING_LIMIT).await,
            }
        });
        Self {
            resource: Resource::new("trending", TrendingTab::default(), fetch)
                .with_interval(ctx.polling.listing()),
        }
    }

    pub fn mount(&mut self) -> JoinHandle<()> {
        self.resource.mount()
    }

    pub fn unmount(&mut self) {
        self.resource.unmount();
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        self.resource.refetch()
    }

    pub fn tab(&self) -> TrendingTab {
        self.resource.deps()
    }

    /// Switch to the next ranking. The old list stays visible until the new one lands.
    pub fn cycle_tab(&self) -> Option<JoinHandle<()>> {
        self.resource.set_deps(self.tab().next())
    }

    pub fn state(&self) -> watch::Ref<'_, ResourceState<Vec<Cryptocurrency>>> {
        self.resource.state()
    }
}

/// The newest articles from the last day.
pub struct LatestNewsPanel {
    resource: Resource<(), Vec<CryptoNews>>,
}

impl LatestNewsPanel {
    pub fn new(ctx: &ViewContext) -> Self {
        let fetch = ctx.fetcher(|api, ()| async move {
            let mut news = api.recent_news(DEFAULT_RECENT_HOURS).await?;
            news.truncate(LATEST_NEWS_COUNT);
            Ok(news)
        });
        Self {
            resource: Resource::new("latest_news", (), fetch).with_interval(ctx.polling.news()),
        }
    }

    pub fn mount(&mut self) -> JoinHandle<()> {
        self.resource.mount()
    }

    pub fn unmount(&mut self) {
        self.resource.unmount();
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        self.resource.refetch()
    }

    pub fn state(&self) -> watch::Ref<'_, ResourceState<Vec<CryptoNews>>> {
        self.resource.state()
    }
}
