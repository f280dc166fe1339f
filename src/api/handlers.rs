//! API handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorDetail};
use crate::api::extract::Symbol;
use crate::api::AppState;
use crate::health::{
    HealthResponse, HealthStatus, LivenessResponse, ReadinessResponse, DATABASE_COMPONENT,
};
use crate::types::{StockInfo, StockSymbol};

/// Service name, version and environment
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses((status = 200, description = "Service identity", body = RootResponse))
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let app = &state.config.app;

    Json(RootResponse {
        name: app.name.clone(),
        version: app.version.clone(),
        environment: app.environment.to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub environment: String,
}

/// Health check with component status
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service status", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let details = state.component_status().await;
    // No registered database check means there is no database to be down.
    let database = details.get(DATABASE_COMPONENT).copied().unwrap_or(true);

    Json(HealthResponse {
        status: HealthStatus::from_database(database),
        version: state.config.app.version.clone(),
        database,
        environment: state.config.app.environment.to_string(),
    })
}

/// Readiness check: 200 when every component is up, 503 otherwise
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Every component is available", body = ReadinessResponse),
        (status = 503, description = "At least one component is down", body = ReadinessResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let response = ReadinessResponse::from_details(state.component_status().await);

    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness check. Answers whenever the process can answer at all.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses((status = 200, description = "Process is alive", body = LivenessResponse))
)]
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse::alive())
}

/// Full quote for one symbol
#[utoipa::path(
    get,
    path = "/stocks/info/{symbol}",
    tag = "stocks",
    params(("symbol" = String, Path, description = "Ticker symbol, 1 to 10 characters, any case")),
    responses(
        (status = 200, description = "Current quote", body = StockInfo),
        (status = 404, description = "Unknown symbol", body = ErrorDetail),
        (status = 422, description = "Symbol length out of range", body = ErrorDetail),
        (status = 500, description = "Unexpected failure", body = ErrorDetail)
    )
)]
pub async fn stock_info(
    State(state): State<AppState>,
    Symbol(symbol): Symbol,
) -> Result<Json<StockInfo>, ApiError> {
    let info = state.stocks.lookup(&symbol).await?;
    Ok(Json(info))
}

/// Every symbol in the provider
#[utoipa::path(
    get,
    path = "/stocks/popular",
    tag = "stocks",
    responses(
        (status = 200, description = "Symbols in table order", body = Vec<StockSymbol>),
        (status = 500, description = "Unexpected failure", body = ErrorDetail)
    )
)]
pub async fn popular_stocks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StockSymbol>>, ApiError> {
    let symbols = state.stocks.list_all().await?;
    Ok(Json(symbols))
}

/// Fallback for unmatched routes
pub async fn not_found() -> (StatusCode, Json<ErrorDetail>) {
    (StatusCode::NOT_FOUND, Json(ErrorDetail::new("Not Found")))
}
