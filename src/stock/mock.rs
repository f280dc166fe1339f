//! In-memory stock provider backed by a fixed table

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{normalize_symbol, StockProvider};
use crate::types::{StockInfo, StockRecord, StockSymbol};
use crate::{Error, Result};

/// Static lookup table of stock records.
///
/// Records are immutable after construction and kept in insertion order,
/// which is also the order of [`StockProvider::list_all`].
#[derive(Debug, Clone)]
pub struct MockStockProvider {
    records: Vec<StockRecord>,
}

impl MockStockProvider {
    /// Build a provider over an arbitrary table. Symbols are stored uppercase.
    pub fn new(records: Vec<StockRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                record.symbol = normalize_symbol(&record.symbol);
                record
            })
            .collect();

        Self { records }
    }

    /// Provider over the built-in reference dataset.
    pub fn reference() -> Self {
        Self::new(reference_records())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find(&self, symbol: &str) -> Option<&StockRecord> {
        self.records.iter().find(|record| record.symbol == symbol)
    }
}

impl Default for MockStockProvider {
    fn default() -> Self {
        Self::reference()
    }
}

#[async_trait]
impl StockProvider for MockStockProvider {
    async fn lookup(&self, symbol: &str) -> Result<StockInfo> {
        let symbol = normalize_symbol(symbol);
        tracing::info!(%symbol, "Looking up stock info");

        match self.find(&symbol) {
            Some(record) => Ok(record.quote(Utc::now())),
            None => {
                tracing::warn!(%symbol, "Stock symbol not found");
                Err(Error::not_found(symbol))
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<StockSymbol>> {
        tracing::info!(count = self.records.len(), "Listing popular stocks");
        Ok(self.records.iter().map(StockSymbol::from).collect())
    }
}

fn record(
    symbol: &str,
    name: &str,
    current_price: Decimal,
    previous_close: Decimal,
    volume: u64,
    market_cap: u64,
) -> StockRecord {
    StockRecord {
        symbol: symbol.to_string(),
        name: name.to_string(),
        exchange: "NASDAQ".to_string(),
        current_price,
        previous_close,
        volume,
        market_cap: Some(market_cap),
    }
}

/// Development dataset served until a real market-data source is wired in.
fn reference_records() -> Vec<StockRecord> {
    vec![
        record(
            "AAPL",
            "Apple Inc.",
            Decimal::new(15025, 2),
            Decimal::new(14850, 2),
            50_000_000,
            2_500_000_000_000,
        ),
        record(
            "GOOGL",
            "Alphabet Inc.",
            Decimal::new(14075, 2),
            Decimal::new(13920, 2),
            25_000_000,
            1_800_000_000_000,
        ),
        record(
            "MSFT",
            "Microsoft Corporation",
            Decimal::new(38050, 2),
            Decimal::new(37580, 2),
            30_000_000,
            2_800_000_000_000,
        ),
        record(
            "TSLA",
            "Tesla, Inc.",
            Decimal::new(24530, 2),
            Decimal::new(24810, 2),
            120_000_000,
            780_000_000_000,
        ),
        record(
            "AMZN",
            "Amazon.com Inc.",
            Decimal::new(17580, 2),
            Decimal::new(17350, 2),
            45_000_000,
            1_800_000_000_000,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_computes_change_for_every_symbol() {
        let provider = MockStockProvider::reference();

        for record in reference_records() {
            let info = provider.lookup(&record.symbol).await.unwrap();
            let change = record.current_price - record.previous_close;

            assert_eq!(info.symbol, record.symbol);
            assert_eq!(info.change, change);
            assert_eq!(
                info.change_percent,
                change / record.previous_close * Decimal::ONE_HUNDRED
            );
            assert_eq!(info.volume, record.volume);
            assert_eq!(info.market_cap, record.market_cap);
        }
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let provider = MockStockProvider::reference();

        let lower = provider.lookup("aapl").await.unwrap();
        let upper = provider.lookup("AAPL").await.unwrap();

        assert_eq!(
            StockInfo {
                last_updated: upper.last_updated,
                ..lower
            },
            upper
        );
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found() {
        let provider = MockStockProvider::reference();

        for symbol in ["ZZZZ", "zzzz", "NFLX"] {
            match provider.lookup(symbol).await {
                Err(Error::SymbolNotFound(s)) => assert_eq!(s, symbol.to_uppercase()),
                other => panic!("expected not found for {symbol}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn list_all_keeps_table_order() {
        let provider = MockStockProvider::reference();
        let symbols = provider.list_all().await.unwrap();

        let tickers: Vec<_> = symbols.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(tickers, ["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN"]);
        assert!(symbols
            .iter()
            .all(|s| !s.symbol.is_empty() && !s.name.is_empty() && !s.exchange.is_empty()));
    }

    #[tokio::test]
    async fn custom_table_is_isolated_and_normalized() {
        let provider = MockStockProvider::new(vec![StockRecord {
            symbol: "new".to_string(),
            name: "Newco".to_string(),
            exchange: "NYSE".to_string(),
            current_price: Decimal::new(500, 2),
            previous_close: Decimal::ZERO,
            volume: 10,
            market_cap: None,
        }]);

        assert_eq!(provider.len(), 1);
        let info = provider.lookup("New").await.unwrap();
        assert_eq!(info.symbol, "NEW");
        assert_eq!(info.change_percent, Decimal::ZERO);
        assert!(provider.lookup("AAPL").await.is_err());
    }
}
