//! Domain values for the transaction API.
//!
//! # Design
//! `Transaction` keeps the price as a plain `i64` so the record stays a
//! straightforward serde value. `TradePrice` is a formatting layer that
//! callers obtain through `Transaction::trade_price()`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Language;

/// JPY per USD used by `TradePrice::format` when the caller has no rate.
pub const DEFAULT_USD_RATE: f64 = 150.0;

/// One real-estate sale record returned by the API.
///
/// Field names are English; string values are in the language requested by
/// the `SearchCondition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Total price in JPY. Falls back to 0 when the source value is missing
    /// or unparsable, so a real 0 and a parse failure look the same.
    pub transaction_price: i64,
    /// Area in square meters. Falls back to 0.0 exactly like
    /// `transaction_price`.
    pub area: f64,
    /// Unit price per tsubo.
    pub unit_price: Option<f64>,
    pub prefecture: String,
    pub city: String,
    pub district: Option<String>,
    pub building_year: Option<i32>,
    /// Residential land, pre-owned condominium, etc.
    pub property_type: String,
    /// RC, wood, steel, etc.
    pub structure: Option<String>,
    /// Percent.
    pub floor_area_ratio: Option<f64>,
    /// Percent.
    pub building_coverage: Option<f64>,
    /// Meters.
    pub frontage_road_width: Option<f64>,
    /// e.g. "2024Q1".
    pub transaction_period: String,
}

impl Transaction {
    pub fn trade_price(&self) -> TradePrice {
        TradePrice(self.transaction_price)
    }
}

/// A JPY amount with JPY and USD renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradePrice(pub i64);

impl TradePrice {
    pub fn amount(self) -> i64 {
        self.0
    }

    /// `¥50,000,000`.
    pub fn as_jpy(self) -> String {
        with_symbol('¥', self.0 as i128)
    }

    /// Converts at `rate` JPY per USD, rounded to the nearest dollar.
    ///
    /// `None` unless `rate` is finite and positive.
    pub fn as_usd(self, rate: f64) -> Option<String> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        let dollars = (self.0 as f64 / rate).round_ties_even();
        if !dollars.is_finite() || dollars.abs() >= i128::MAX as f64 {
            return None;
        }
        Some(with_symbol('$', dollars as i128))
    }

    /// JPY for Japanese output, USD for everything else. The rate is only
    /// checked on the USD path.
    pub fn format(self, language: Language, rate: f64) -> Option<String> {
        match language {
            Language::Ja => Some(self.as_jpy()),
            Language::En => self.as_usd(rate),
        }
    }
}

impl fmt::Display for TradePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_jpy())
    }
}

impl From<i64> for TradePrice {
    fn from(amount: i64) -> Self {
        TradePrice(amount)
    }
}

fn with_symbol(symbol: char, value: i128) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{symbol}{}", group_thousands(value.unsigned_abs()))
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpy_uses_thousands_separators() {
        assert_eq!(TradePrice(50_000_000).as_jpy(), "¥50,000,000");
        assert_eq!(TradePrice(999).as_jpy(), "¥999");
        assert_eq!(TradePrice(1_000).as_jpy(), "¥1,000");
        assert_eq!(TradePrice(0).as_jpy(), "¥0");
    }

    #[test]
    fn negative_amounts_keep_the_sign_in_front() {
        assert_eq!(TradePrice(-1_234_567).as_jpy(), "-¥1,234,567");
    }

    #[test]
    fn usd_divides_by_rate_and_rounds() {
        assert_eq!(TradePrice(50_000_000).as_usd(150.0).as_deref(), Some("$333,333"));
        assert_eq!(TradePrice(30_000_000).as_usd(100.0).as_deref(), Some("$300,000"));
        assert_eq!(TradePrice(149).as_usd(DEFAULT_USD_RATE).as_deref(), Some("$1"));
        assert_eq!(TradePrice(-300).as_usd(150.0).as_deref(), Some("-$2"));
    }

    #[test]
    fn usd_ties_round_to_even() {
        assert_eq!(TradePrice(15).as_usd(10.0).as_deref(), Some("$2"));
        assert_eq!(TradePrice(25).as_usd(10.0).as_deref(), Some("$2"));
    }

    #[test]
    fn usd_rejects_unusable_rates() {
        let price = TradePrice(50_000_000);
        assert_eq!(price.as_usd(0.0), None);
        assert_eq!(price.as_usd(-150.0), None);
        assert_eq!(price.as_usd(f64::NAN), None);
        assert_eq!(price.as_usd(f64::INFINITY), None);
        assert_eq!(TradePrice(i64::MAX).as_usd(f64::MIN_POSITIVE), None);
        assert_eq!(price.format(Language::En, 0.0), None);
    }

    #[test]
    fn japanese_format_ignores_the_rate() {
        let price = TradePrice(50_000_000);
        assert_eq!(price.format(Language::Ja, 150.0).as_deref(), Some("¥50,000,000"));
        assert_eq!(price.format(Language::Ja, 1.0).as_deref(), Some("¥50,000,000"));
        assert_eq!(price.format(Language::Ja, 0.0).as_deref(), Some("¥50,000,000"));
        assert_eq!(price.format(Language::Ja, f64::NAN).as_deref(), Some("¥50,000,000"));
    }

    #[test]
    fn english_format_is_usd() {
        assert_eq!(
            TradePrice(50_000_000).format(Language::En, DEFAULT_USD_RATE).as_deref(),
            Some("$333,333")
        );
    }

    #[test]
    fn display_is_jpy() {
        assert_eq!(TradePrice(12_345).to_string(), "¥12,345");
    }

    #[test]
    fn transaction_exposes_its_trade_price() {
        let transaction = Transaction {
            transaction_price: 42_000_000,
            area: 70.0,
            unit_price: None,
            prefecture: "Tokyo".to_string(),
            city: "Chiyoda Ward".to_string(),
            district: None,
            building_year: None,
            property_type: "Residential Land(Land Only)".to_string(),
            structure: None,
            floor_area_ratio: None,
            building_coverage: None,
            frontage_road_width: None,
            transaction_period: "2024Q1".to_string(),
        };
        assert_eq!(transaction.trade_price(), TradePrice(42_000_000));
        assert_eq!(transaction.trade_price().as_jpy(), "¥42,000,000");
    }
}
