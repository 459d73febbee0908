//! Number and date formatting for display.
//!
//! Missing values render as `-` everywhere so tables keep their columns.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const MISSING: &str = "-";

/// Round half away from zero and fix the scale, so `Display` shows exactly `places` decimals.
fn round(value: Decimal, places: usize) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(places as u32, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places as u32);
    rounded
}

/// Insert thousands separators (e.g. 1234567 -> "1,234,567").
pub fn group_digits(value: u64) -> String {
    group_integer(&value.to_string())
}

fn group_integer(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

/// Format a decimal with commas and a fixed number of places.
pub fn format_decimal(value: Decimal, places: usize) -> String {
    let value = round(value, places);
    let formatted = value.abs().to_string();
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}{}.{fraction}", group_integer(integer)),
        None => format!("{sign}{}", group_integer(integer)),
    }
}

/// Dollar price with precision scaled to the magnitude.
pub fn format_price(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let places = if value.abs() >= Decimal::ONE {
        2
    } else if value.abs() >= Decimal::new(1, 2) {
        4
    } else {
        6
    };
    format!("${}", format_decimal(value, places))
}

/// Dollar amount in compact form (e.g. "$1.23T", "$456.70M").
pub fn format_compact_usd(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("${}", compact(value)),
        None => MISSING.to_string(),
    }
}

/// Coin supply in compact form without a currency sign.
pub fn format_supply(value: Option<Decimal>) -> String {
    match value {
        Some(value) => compact(value),
        None => MISSING.to_string(),
    }
}

fn compact(value: Decimal) -> String {
    const UNITS: [(i64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];
    for (scale, suffix) in UNITS {
        let scale = Decimal::from(scale);
        if value.abs() >= scale {
            return format!("{}{suffix}", round(value / scale, 2));
        }
    }
    format_decimal(value, 2)
}

/// Signed percentage with two decimals (e.g. "+1.23%").
pub fn format_percent(value: Option<Decimal>) -> String {
    match value.map(|v| round(v, 2)) {
        Some(value) if value.is_sign_negative() && !value.is_zero() => format!("{value}%"),
        Some(value) => format!("+{}%", value.abs()),
        None => MISSING.to_string(),
    }
}

/// Unsigned percentage with one decimal, used for dominance.
pub fn format_share(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("{}%", round(value, 1)),
        None => MISSING.to_string(),
    }
}

pub fn format_count(value: Option<u32>) -> String {
    value
        .map(|v| group_digits(u64::from(v)))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Relative age such as "5m ago"; older than a week falls back to the date.
pub fn format_time_ago(value: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let elapsed = now.signed_duration_since(value);
    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        value.format("%Y-%m-%d").to_string()
    }
}

/// Shorten to `max` characters, ending in an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
