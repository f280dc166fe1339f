//! HTTP error mapping
//!
//! Client errors carry a `{detail}` body. Anything unexpected is logged here
//! and answered with a fixed 500 body so internals never reach the caller.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::Error;

pub const INTERNAL_ERROR_DETAIL: &str = "internal error";
pub const INTERNAL_ERROR_TYPE: &str = "internal_error";

/// Error body returned for every non-2xx answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(example = "Stock symbol 'ZZZZ' not found")]
    pub detail: String,
    /// Only set on 500s
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            kind: None,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// 404
    NotFound(String),
    /// 422, request rejected before reaching business logic
    Validation(String),
    /// 500, detail is logged and never returned
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::SymbolNotFound(_) => ApiError::NotFound(err.to_string()),
            Error::InvalidSymbol(msg) => ApiError::Validation(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(detail) | ApiError::Validation(detail) => ErrorDetail::new(detail),
            ApiError::Internal(detail) => {
                tracing::error!(exception = %detail, "Unhandled error while serving request");
                ErrorDetail {
                    detail: INTERNAL_ERROR_DETAIL.to_string(),
                    kind: Some(INTERNAL_ERROR_TYPE.to_string()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Panic hook for the catch-panic layer.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(format!("panic: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status() {
        let err: ApiError = Error::not_found("ZZZZ").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = Error::InvalidSymbol("too long".into()).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = Error::internal("boom").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_error_body_omits_type() {
        let body = serde_json::to_value(ErrorDetail::new("Not Found")).unwrap();
        assert_eq!(body, serde_json::json!({ "detail": "Not Found" }));
    }

    #[test]
    fn panic_becomes_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
