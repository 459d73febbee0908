//! Client-side table sorting.

use crate::api::Cryptocurrency;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Sortable columns of the market table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    #[default]
    Rank,
    Price,
    Change24h,
    Change7d,
    MarketCap,
    Volume24h,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        Self::Rank,
        Self::Price,
        Self::Change24h,
        Self::Change7d,
        Self::MarketCap,
        Self::Volume24h,
    ];

    /// The value compared for this column. Missing values count as zero.
    pub fn key(&self, coin: &Cryptocurrency) -> Decimal {
        let value = match self {
            Self::Rank => coin.market_cap_rank.map(Decimal::from),
            Self::Price => coin.current_price,
            Self::Change24h => coin.price_change_percentage_24h,
            Self::Change7d => coin.price_change_percentage_7d,
            Self::MarketCap => coin.market_cap,
            Self::Volume24h => coin.total_volume,
        };
        value.unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rank => "#",
            Self::Price => "Price",
            Self::Change24h => "24h",
            Self::Change7d => "7d",
            Self::MarketCap => "Market Cap",
            Self::Volume24h => "Volume (24h)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the active column flips direction; another column starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn compare(&self, a: &Cryptocurrency, b: &Cryptocurrency) -> Ordering {
        let ordering = self.field.key(a).cmp(&self.field.key(b));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable sort of `coins`; equal keys keep their server order.
    pub fn apply<'a>(&self, coins: &'a [Cryptocurrency]) -> Vec<&'a Cryptocurrency> {
        let mut sorted: Vec<&Cryptocurrency> = coins.iter().collect();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }

    /// Column marker for table headers.
    pub fn indicator(&self, field: SortField) -> &'static str {
        match (self.field == field, self.direction) {
            (false, _) => "",
            (true, SortDirection::Asc) => "▲",
            (true, SortDirection::Desc) => "▼",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn coin(id: &str, rank: u32, price: Decimal, change_24h: Decimal) -> Cryptocurrency {
        serde_json::from_value(serde_json::json!({
            "coinId": id,
            "symbol": id,
            "name": id,
            "marketCapRank": rank,
            "currentPrice": price,
            "priceChangePercentage24h": change_24h,
        }))
        .unwrap()
    }

    fn ids(coins: &[&Cryptocurrency]) -> Vec<String> {
        coins.iter().map(|c| c.coin_id.clone()).collect()
    }

    fn sample() -> Vec<Cryptocurrency> {
        vec![
            coin("c", 3, dec!(10), dec!(-2.5)),
            coin("a", 1, dec!(60000), dec!(1.0)),
            coin("d", 4, dec!(10), dec!(5.25)),
            coin("b", 2, dec!(3000), dec!(1.0)),
        ]
    }

    #[test]
    fn test_default_is_rank_ascending() {
        let state = SortState::default();
        assert_eq!(ids(&state.apply(&sample())), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_toggle_same_field_flips_direction() {
        let mut state = SortState::default();
        state.toggle(SortField::Rank);
        assert_eq!(state.direction, SortDirection::Desc);
        assert_eq!(ids(&state.apply(&sample())), vec!["d", "c", "b", "a"]);

        state.toggle(SortField::Rank);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_toggle_new_field_resets_to_ascending() {
        let mut state = SortState::default();
        state.toggle(SortField::Rank);
        state.toggle(SortField::Price);
        assert_eq!(
            state,
            SortState {
                field: SortField::Price,
                direction: SortDirection::Asc
            }
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut state = SortState::default();
        state.toggle(SortField::Price);
        // c and d share a price; input order c before d is kept.
        assert_eq!(ids(&state.apply(&sample())), vec!["c", "d", "b", "a"]);

        state.toggle(SortField::Price);
        assert_eq!(ids(&state.apply(&sample())), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_negative_changes_sort_below_positive() {
        let mut state = SortState::default();
        state.toggle(SortField::Change24h);
        assert_eq!(ids(&state.apply(&sample())), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_missing_values_sort_as_zero() {
        let mut coins = sample();
        coins.push(
            serde_json::from_value(serde_json::json!({
                "coinId": "new", "symbol": "new", "name": "New"
            }))
            .unwrap(),
        );
        let mut state = SortState::default();
        state.toggle(SortField::Volume24h);
        // Every volume is missing, so the input order is preserved.
        assert_eq!(ids(&state.apply(&coins)), vec!["c", "a", "d", "b", "new"]);

        state.toggle(SortField::Change24h);
        assert_eq!(ids(&state.apply(&coins))[..2], ["c".to_string(), "new".to_string()]);
    }

    #[test]
    fn test_every_field_respects_direction() {
        let coins = sample();
        for field in SortField::ALL {
            let asc = SortState {
                field,
                direction: SortDirection::Asc,
            };
            let desc = SortState {
                field,
                direction: SortDirection::Desc,
            };
            let up = asc.apply(&coins);
            let down = desc.apply(&coins);
            assert!(up.windows(2).all(|w| field.key(w[0]) <= field.key(w[1])));
            assert!(down.windows(2).all(|w| field.key(w[0]) >= field.key(w[1])));
        }
    }

    #[test]
    fn test_indicator() {
        let state = SortState::default();
        assert_eq!(state.indicator(SortField::Rank), "▲");
        assert_eq!(state.indicator(SortField::Price), "");
    }
}
