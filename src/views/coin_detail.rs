//! Single-coin screen: header, price chart and related news.

use super::{Selection, ViewContext};
use crate::api::{CryptoNews, Cryptocurrency, PageResponse, PriceHistory, Timeframe};
use crate::state::{FavoritesStore, Resource, ResourceState};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Related articles shown under the chart.
pub const RELATED_NEWS_COUNT: u32 = 5;

/// Height of the normalised sparkline series.
const SPARKLINE_SCALE: u64 = 100;

pub struct CoinDetail {
    coin_id: String,
    coin: Resource<String, Cryptocurrency>,
    history: Resource<(String, Timeframe), Vec<PriceHistory>>,
    related: Resource<String, PageResponse<CryptoNews>>,
    favorites: FavoritesStore,
    related_selection: Selection,
}

impl CoinDetail {
    pub fn new(ctx: &ViewContext, coin_id: impl Into<String>) -> Self {
        let coin_id = coin_id.into();

        let coin = ctx.fetcher(|api, id: String| async move { api.get_cryptocurrency(&id).await });
        let history = ctx.fetcher(|api, (id, timeframe): (String, Timeframe)| async move {
            api.price_history(&id, timeframe.interval(), timeframe.hours())
                .await
        });
        let related = ctx.fetcher(|api, id: String| async move {
            api.news_by_crypto(&id, 0, RELATED_NEWS_COUNT).await
        });

        Self {
            coin: Resource::new("coin_detail", coin_id.clone(), coin)
                .with_interval(ctx.polling.detail()),
            history: Resource::new(
                "price_history",
                (coin_id.clone(), Timeframe::default()),
                history,
            ),
            related: Resource::new("related_news", coin_id.clone(), related),
            favorites: ctx.favorites.clone(),
            related_selection: Selection::default(),
            coin_id,
        }
    }

    pub fn coin_id(&self) -> &str {
        &self.coin_id
    }

    /// Start every resource. The returned handles finish with the initial fetches.
    pub fn mount(&mut self) -> Vec<JoinHandle<()>> {
        vec![
            self.coin.mount(),
            self.history.mount(),
            self.related.mount(),
        ]
    }

    pub fn unmount(&mut self) {
        self.coin.unmount();
        self.history.unmount();
        self.related.unmount();
    }

    pub fn refresh(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.coin.refetch(),
            self.history.refetch(),
            self.related.refetch(),
        ]
    }

    pub fn coin(&self) -> watch::Ref<'_, ResourceState<Cryptocurrency>> {
        self.coin.state()
    }

    pub fn history(&self) -> watch::Ref<'_, ResourceState<Vec<PriceHistory>>> {
        self.history.state()
    }

    pub fn related(&self) -> watch::Ref<'_, ResourceState<PageResponse<CryptoNews>>> {
        self.related.state()
    }

    pub fn timeframe(&self) -> Timeframe {
        self.history.deps().1
    }

    pub fn set_timeframe(&self, timeframe: Timeframe) -> Option<JoinHandle<()>> {
        self.history.set_deps((self.coin_id.clone(), timeframe))
    }

    pub fn cycle_timeframe(&self) -> Option<JoinHandle<()>> {
        self.set_timeframe(self.timeframe().next())
    }

    pub fn is_favorite(&self) -> bool {
        self.favorites.is_favorite(&self.coin_id)
    }

    /// Returns the new favorite status.
    pub fn toggle_favorite(&self) -> bool {
        self.favorites.toggle(&self.coin_id)
    }

    /// Whether the loaded series belongs to the selected timeframe.
    pub fn chart_is_current(&self) -> bool {
        self.history.is_current()
    }

    /// Prices scaled to `0..=100` for a sparkline, oldest first.
    ///
    /// Empty while a timeframe change is in flight.
    pub fn sparkline(&self) -> Vec<u64> {
        if !self.chart_is_current() {
            return Vec::new();
        }
        let state = self.history.state();
        let Some(points) = state.data() else {
            return Vec::new();
        };
        let Some(min) = points.iter().map(|p| p.price).min() else {
            return Vec::new();
        };
        let max = points.iter().map(|p| p.price).max().unwrap_or(min);
        let range = max - min;

        points
            .iter()
            .map(|p| {
                if range.is_zero() {
                    return SPARKLINE_SCALE / 2;
                }
                ((p.price - min) / range * Decimal::from(SPARKLINE_SCALE))
                    .round()
                    .to_u64()
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Percent change from the first to the last point of the series.
    pub fn period_change(&self) -> Option<Decimal> {
        if !self.chart_is_current() {
            return None;
        }
        let state = self.history.state();
        let points = state.data()?;
        let first = points.first()?.price;
        let last = points.last()?.price;
        if first.is_zero() {
            return None;
        }
        Some((last - first) / first * Decimal::ONE_HUNDRED)
    }

    pub fn select_next_news(&mut self) {
        let len = self.related_len();
        self.related_selection.down(len);
    }

    pub fn select_prev_news(&mut self) {
        self.related_selection.up();
    }

    pub fn selected_news_index(&self) -> Option<usize> {
        self.related_selection.get(self.related_len())
    }

    pub fn selected_news_id(&self) -> Option<i64> {
        let index = self.selected_news_index()?;
        let state = self.related.state();
        state.data()?.content.get(index).map(|n| n.id)
    }

    fn related_len(&self) -> usize {
        self.related
            .state()
            .data()
            .map_or(0, |page| page.content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMarketApi, PriceInterval};
    use crate::views::testing::{coin, context, news, page};
    use chrono::{Duration, TimeZone, Utc};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn series(prices: &[Decimal]) -> Vec<PriceHistory> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| PriceHistory {
                timestamp: start + Duration::hours(i as i64),
                price: *price,
                market_cap: None,
                volume: None,
            })
            .collect()
    }

    fn api_for(prices: Vec<Decimal>) -> MockMarketApi {
        let mut api = MockMarketApi::new();
        api.expect_get_cryptocurrency()
            .with(eq("bitcoin"))
            .returning(|id| Ok(coin(id, 1)));
        api.expect_price_history()
            .with(eq("bitcoin"), eq(PriceInterval::Hour1), eq(168))
            .times(1)
            .returning(move |_, _, _| Ok(series(&prices)));
        api.expect_news_by_crypto()
            .with(eq("bitcoin"), eq(0), eq(RELATED_NEWS_COUNT))
            .times(1)
            .returning(|_, _, _| Ok(page(vec![news(7, "ETF"), news(9, "Halving")], 0, 1, 5)));
        api
    }

    async fn mounted(api: MockMarketApi) -> CoinDetail {
        let mut detail = CoinDetail::new(&context(api), "bitcoin");
        for handle in detail.mount() {
            handle.await.unwrap();
        }
        detail
    }

    #[tokio::test]
    async fn test_mount_loads_coin_chart_and_news() {
        let detail = mounted(api_for(vec![dec!(100), dec!(150), dec!(200)])).await;

        assert_eq!(detail.coin().data().unwrap().coin_id, "bitcoin");
        assert_eq!(detail.timeframe(), Timeframe::SevenDays);
        assert_eq!(detail.sparkline(), vec![0, 50, 100]);
        assert_eq!(detail.period_change(), Some(dec!(100)));
        assert_eq!(detail.selected_news_id(), Some(7));
    }

    #[tokio::test]
    async fn test_cycle_timeframe_refetches_history() {
        let mut api = api_for(vec![dec!(1)]);
        api.expect_price_history()
            .with(eq("bitcoin"), eq(PriceInterval::Day1), eq(720))
            .times(1)
            .returning(|_, _, _| Ok(series(&[dec!(5), dec!(5)])));

        let detail = mounted(api).await;
        detail.cycle_timeframe().unwrap().await.unwrap();

        assert_eq!(detail.timeframe(), Timeframe::ThirtyDays);
        // A flat series sits mid-height.
        assert_eq!(detail.sparkline(), vec![50, 50]);
        assert_eq!(detail.period_change(), Some(dec!(0)));

        // Re-selecting the same timeframe issues nothing.
        assert!(detail.set_timeframe(Timeframe::ThirtyDays).is_none());
    }

    #[tokio::test]
    async fn test_previous_series_hidden_during_timeframe_change() {
        let mut api = api_for(vec![dec!(100), dec!(200)]);
        api.expect_price_history()
            .with(eq("bitcoin"), eq(PriceInterval::Day1), eq(720))
            .times(1)
            .returning(|_, _, _| Ok(series(&[dec!(10), dec!(5)])));

        let detail = mounted(api).await;
        assert_eq!(detail.period_change(), Some(dec!(100)));

        let pending = detail.cycle_timeframe().unwrap();
        assert_eq!(detail.timeframe(), Timeframe::ThirtyDays);
        assert!(!detail.chart_is_current());
        assert!(detail.sparkline().is_empty());
        assert_eq!(detail.period_change(), None);

        pending.await.unwrap();
        assert!(detail.chart_is_current());
        assert_eq!(detail.sparkline(), vec![100, 0]);
        assert_eq!(detail.period_change(), Some(dec!(-50)));
    }

    #[tokio::test]
    async fn test_unknown_coin_reports_not_found() {
        let mut api = MockMarketApi::new();
        api.expect_get_cryptocurrency()
            .returning(|_| Err(crate::Error::http(404)));
        api.expect_price_history()
            .returning(|_, _, _| Ok(Vec::new()));
        api.expect_news_by_crypto()
            .returning(|_, _, _| Ok(page(Vec::new(), 0, 0, 5)));

        let detail = mounted(api).await;
        assert_eq!(detail.coin().error.as_deref(), Some("Not found"));
        assert!(detail.sparkline().is_empty());
        assert_eq!(detail.period_change(), None);
        assert_eq!(detail.selected_news_id(), None);
    }

    #[test]
    fn test_favorite_toggle_uses_shared_store() {
        let ctx = context(MockMarketApi::new());
        let favorites = ctx.favorites.clone();
        let detail = CoinDetail::new(&ctx, "bitcoin");

        assert!(!detail.is_favorite());
        assert!(detail.toggle_favorite());
        assert!(favorites.is_favorite("bitcoin"));
        assert!(!detail.toggle_favorite());
        assert!(favorites.is_empty());
    }

    #[tokio::test]
    async fn test_related_news_selection() {
        let mut detail = mounted(api_for(vec![dec!(1)])).await;
        detail.select_next_news();
        assert_eq!(detail.selected_news_id(), Some(9));
        detail.select_next_news();
        assert_eq!(detail.selected_news_id(), Some(9));
        detail.select_prev_news();
        assert_eq!(detail.selected_news_id(), Some(7));
    }
}
