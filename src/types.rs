//! Core types for stock-advisor

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Trading volume in shares
pub type Volume = u64;

/// Baseline facts about a ticker, as held by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    /// Uppercase ticker symbol
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub volume: Volume,
    /// Market capitalization in USD
    pub market_cap: Option<u64>,
}

/// Listing projection of a stock record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct StockSymbol {
    #[schema(example = "AAPL")]
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

impl From<&StockRecord> for StockSymbol {
    fn from(record: &StockRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            name: record.name.clone(),
            exchange: record.exchange.clone(),
        }
    }
}

/// Full quote for a single ticker, with derived price movement.
///
/// Monetary fields are exact decimals internally and go out on the wire as
/// JSON numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct StockInfo {
    #[schema(example = "AAPL")]
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub previous_close: Decimal,
    /// `current_price - previous_close`
    #[serde(with = "rust_decimal::serde::float")]
    pub change: Decimal,
    /// `change / previous_close * 100`
    #[serde(with = "rust_decimal::serde::float")]
    pub change_percent: Decimal,
    #[schema(value_type = u64)]
    pub volume: Volume,
    #[serde(default)]
    pub market_cap: Option<u64>,
    /// Time the quote was produced, not the age of the underlying data
    pub last_updated: DateTime<Utc>,
}
