//! stock-advisor - HTTP API skeleton for an investment advisor service
//!
//! Provides:
//! - Health, readiness and liveness endpoints
//! - OpenAPI document and Swagger UI
//! - Stock quotes and a popular-stock listing from an in-memory table
//! - Layered configuration from file + environment
//! - Structured key=value logging

pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod stock;
pub mod types;

pub use error::{Error, Result};
