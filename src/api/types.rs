//! Wire types returned by the CryptoGuide backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Standard offset-pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    /// Zero-based index of this page.
    pub number: u32,
}

impl<T> Default for PageResponse<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size: 0,
            number: 0,
        }
    }
}

impl<T> PageResponse<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A thematic classification (e.g. "Layer 1", "DeFi").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub id: Option<i64>,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Only present on the `with-count` listing.
    #[serde(default)]
    pub crypto_count: Option<u64>,
}

/// A cryptocurrency snapshot.
///
/// Numeric market fields are nullable on the wire; display and sorting treat
/// a missing value as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cryptocurrency {
    #[serde(default)]
    pub id: Option<i64>,
    pub coin_id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub fully_diluted_valuation: Option<Decimal>,
    #[serde(default)]
    pub total_volume: Option<Decimal>,
    #[serde(default, rename = "high24h")]
    pub high_24h: Option<Decimal>,
    #[serde(default, rename = "low24h")]
    pub low_24h: Option<Decimal>,

    #[serde(default, rename = "priceChange24h")]
    pub price_change_24h: Option<Decimal>,
    #[serde(default, rename = "priceChangePercentage24h")]
    pub price_change_percentage_24h: Option<Decimal>,
    #[serde(default, rename = "priceChangePercentage7d")]
    pub price_change_percentage_7d: Option<Decimal>,
    #[serde(default, rename = "priceChangePercentage30d")]
    pub price_change_percentage_30d: Option<Decimal>,

    #[serde(default)]
    pub circulating_supply: Option<Decimal>,
    #[serde(default)]
    pub total_supply: Option<Decimal>,
    /// `None` means the supply is unbounded.
    #[serde(default)]
    pub max_supply: Option<Decimal>,

    #[serde(default)]
    pub ath: Option<Decimal>,
    #[serde(default, with = "iso8601::option")]
    pub ath_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ath_change_percentage: Option<Decimal>,
    #[serde(default)]
    pub atl: Option<Decimal>,
    #[serde(default, with = "iso8601::option")]
    pub atl_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub atl_change_percentage: Option<Decimal>,

    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub whitepaper: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,

    #[serde(default)]
    pub theme_large: Option<Theme>,
    #[serde(default)]
    pub theme_medium: Option<Theme>,
    #[serde(default)]
    pub theme_small: Option<Theme>,

    #[serde(default, with = "iso8601::option")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Cryptocurrency {
    /// Whether the 24h change is non-negative.
    pub fn is_up_24h(&self) -> bool {
        self.price_change_percentage_24h.unwrap_or_default() >= Decimal::ZERO
    }

    /// Themes from broadest to narrowest, skipping absent ones.
    pub fn themes(&self) -> impl Iterator<Item = &Theme> {
        [&self.theme_large, &self.theme_medium, &self.theme_small]
            .into_iter()
            .flatten()
    }

    /// Non-empty external links with their labels.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Homepage", &self.homepage),
            ("Whitepaper", &self.whitepaper),
            ("GitHub", &self.github),
            ("Twitter", &self.twitter),
            ("Telegram", &self.telegram),
        ]
        .into_iter()
        .filter_map(|(label, link)| {
            link.as_deref()
                .filter(|l| !l.trim().is_empty())
                .map(|l| (label, l))
        })
        .collect()
    }

    /// Share of the max supply already circulating, in percent.
    pub fn supply_ratio(&self) -> Option<Decimal> {
        let circulating = self.circulating_supply?;
        let max = self.max_supply.filter(|m| !m.is_zero())?;
        Some(circulating / max * Decimal::ONE_HUNDRED)
    }
}

/// A news article with its AI summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoNews {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "iso8601::option")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related_crypto_symbols: Vec<String>,
    #[serde(default)]
    pub related_themes: Vec<String>,
    #[serde(default, with = "iso8601::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Market-wide aggregate figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    #[serde(default)]
    pub total_market_cap: Option<Decimal>,
    #[serde(default, rename = "totalVolume24h")]
    pub total_volume_24h: Option<Decimal>,
    #[serde(default, rename = "marketCapChangePercentage24h")]
    pub market_cap_change_percentage_24h: Option<Decimal>,
    #[serde(default)]
    pub btc_dominance: Option<Decimal>,
    #[serde(default)]
    pub eth_dominance: Option<Decimal>,
    #[serde(default)]
    pub up_count: Option<u32>,
    #[serde(default)]
    pub down_count: Option<u32>,
    #[serde(default)]
    pub total_coins: Option<u32>,
}

/// One point of a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<Decimal>,
}

/// Sampling interval for price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceInterval {
    #[serde(rename = "HOUR_1")]
    Hour1,
    #[serde(rename = "DAY_1")]
    Day1,
}

impl PriceInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour1 => "HOUR_1",
            Self::Day1 => "DAY_1",
        }
    }
}

impl std::fmt::Display for PriceInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart timeframe offered in the coin detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    OneDay,
    #[default]
    SevenDays,
    ThirtyDays,
    NinetyDays,
    OneYear,
    All,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Self::OneDay,
        Self::SevenDays,
        Self::ThirtyDays,
        Self::NinetyDays,
        Self::OneYear,
        Self::All,
    ];

    /// Sampling interval requested for this timeframe.
    pub fn interval(&self) -> PriceInterval {
        match self {
            Self::OneDay | Self::SevenDays => PriceInterval::Hour1,
            _ => PriceInterval::Day1,
        }
    }

    /// Lookback window in hours.
    pub fn hours(&self) -> u32 {
        match self {
            Self::OneDay => 24,
            Self::SevenDays => 168,
            Self::ThirtyDays => 720,
            Self::NinetyDays => 2160,
            Self::OneYear => 8760,
            Self::All => 17520,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
            Self::NinetyDays => "90d",
            Self::OneYear => "1y",
            Self::All => "all",
        }
    }

    /// The next timeframe, wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|tf| tf == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// ISO-8601 timestamps as sent by the backend.
///
/// The backend emits zone-less local date-times; those are read as UTC.
/// RFC 3339 strings with an offset are accepted as well.
pub(crate) mod iso8601 {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let s: Option<String> = Option::deserialize(deserializer)?;
            match s.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => super::parse(s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
            }
        }
    }
}
