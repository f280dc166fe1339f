//! Request extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::api::error::ApiError;
use crate::Error;

pub const MIN_SYMBOL_LEN: usize = 1;
pub const MAX_SYMBOL_LEN: usize = 10;

/// Ticker symbol taken from the path, length-checked before the handler runs.
///
/// Case is left untouched; providers normalize.
#[derive(Debug, Clone)]
pub struct Symbol(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Symbol
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(symbol) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        validate_symbol(&symbol)?;

        Ok(Symbol(symbol))
    }
}

pub fn validate_symbol(symbol: &str) -> crate::Result<()> {
    let len = symbol.chars().count();
    if !(MIN_SYMBOL_LEN..=MAX_SYMBOL_LEN).contains(&len) {
        return Err(Error::InvalidSymbol(format!(
            "symbol must be between {} and {} characters, got {}",
            MIN_SYMBOL_LEN, MAX_SYMBOL_LEN, len
        )));
    }
    Ok(())
}
