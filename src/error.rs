//! Error types for stock-advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Stock symbol '{0}' not found")]
    SymbolNotFound(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(symbol: impl Into<String>) -> Self {
        Error::SymbolNotFound(symbol.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_symbol() {
        let err = Error::not_found("ZZZZ");
        assert_eq!(err.to_string(), "Stock symbol 'ZZZZ' not found");
    }
}
