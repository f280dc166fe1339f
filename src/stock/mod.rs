//! Stock data provider abstraction
//!
//! Handlers talk to a [`StockProvider`]; the in-memory [`MockStockProvider`]
//! is the only implementation today. A remote market-data feed or a database
//! would slot in behind the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{StockInfo, StockRecord, StockSymbol};
use crate::Result;

pub mod mock;

pub use mock::MockStockProvider;

/// Stock data provider trait
#[async_trait]
pub trait StockProvider: Send + Sync {
    /// Full quote for a symbol. Matching is case-insensitive.
    ///
    /// Returns [`crate::Error::SymbolNotFound`] for unknown tickers.
    async fn lookup(&self, symbol: &str) -> Result<StockInfo>;

    /// Symbol/name/exchange for every known ticker, in provider order.
    async fn list_all(&self) -> Result<Vec<StockSymbol>>;
}

/// Canonical form used for table keys and lookups.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.to_uppercase()
}

/// Absolute and percentage change from `previous_close` to `current_price`.
///
/// A zero previous close has no defined percentage; it reports `0`.
pub fn price_change(current_price: Decimal, previous_close: Decimal) -> (Decimal, Decimal) {
    let change = current_price - previous_close;

    let change_percent = match change.checked_div(previous_close) {
        Some(ratio) => ratio * Decimal::ONE_HUNDRED,
        None => {
            tracing::warn!(
                %current_price,
                %previous_close,
                "Cannot compute change percent; reporting 0"
            );
            Decimal::ZERO
        }
    };

    (change, change_percent)
}

impl StockRecord {
    /// Project this record into a quote stamped with `now`.
    pub fn quote(&self, now: DateTime<Utc>) -> StockInfo {
        let (change, change_percent) = price_change(self.current_price, self.previous_close);

        StockInfo {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            exchange: self.exchange.clone(),
            current_price: self.current_price,
            previous_close: self.previous_close,
            change,
            change_percent,
            volume: self.volume,
            market_cap: self.market_cap,
            last_updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_change_is_exact() {
        let (change, pct) = price_change(Decimal::new(15025, 2), Decimal::new(14850, 2));
        assert_eq!(change, Decimal::new(175, 2));
        assert_eq!(pct, change / Decimal::new(14850, 2) * Decimal::ONE_HUNDRED);
        assert!(pct > Decimal::new(1178, 3) && pct < Decimal::new(1179, 3));
    }

    #[test]
    fn price_drop_is_negative() {
        let (change, pct) = price_change(Decimal::new(24530, 2), Decimal::new(24810, 2));
        assert_eq!(change, Decimal::new(-280, 2));
        assert!(pct.is_sign_negative());
    }

    #[test]
    fn zero_previous_close_reports_zero_percent() {
        let (change, pct) = price_change(Decimal::new(1000, 2), Decimal::ZERO);
        assert_eq!(change, Decimal::new(1000, 2));
        assert_eq!(pct, Decimal::ZERO);
    }

    #[test]
    fn normalize_uppercases() {
        assert_eq!(normalize_symbol("brk.b"), "BRK.B");
        assert_eq!(normalize_symbol("AAPL"), "AAPL");
    }
}
