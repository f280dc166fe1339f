//! OpenAPI document and Swagger UI

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::error::ErrorDetail;
use crate::api::handlers::{self, RootResponse};
use crate::config::AppConfig;
use crate::health::{HealthResponse, HealthStatus, LivenessResponse, ReadinessResponse};
use crate::types::{StockInfo, StockSymbol};

pub const OPENAPI_PATH: &str = "/openapi.json";
pub const DOCS_PATH: &str = "/docs";

/// Routes mounted at the root.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::root, handlers::health, handlers::readiness, handlers::liveness),
    components(schemas(
        RootResponse,
        HealthStatus,
        HealthResponse,
        ReadinessResponse,
        LivenessResponse
    )),
    tags(
        (name = "service", description = "Service identity"),
        (name = "health", description = "Health, readiness and liveness")
    )
)]
struct ServiceDoc;

/// Routes mounted under the API prefix.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::readiness,
        handlers::liveness,
        handlers::stock_info,
        handlers::popular_stocks
    ),
    components(schemas(StockInfo, StockSymbol, ErrorDetail)),
    tags((name = "stocks", description = "Stock quotes"))
)]
struct VersionedDoc;

/// Join a route path onto the API prefix; a `/` prefix adds nothing.
pub fn under_prefix(prefix: &str, path: &str) -> String {
    if prefix == "/" {
        path.to_string()
    } else {
        format!("{}{}", prefix, path)
    }
}

/// Build the document for the configured prefix, titled after the service.
pub fn openapi(config: &AppConfig) -> utoipa::openapi::OpenApi {
    let prefix = config.app.api_prefix.as_str();
    let service = ServiceDoc::openapi();

    let mut doc = if prefix == "/" {
        let mut doc = service;
        doc.merge(VersionedDoc::openapi());
        doc
    } else {
        service.nest(prefix, VersionedDoc::openapi())
    };

    doc.info.title = config.app.name.clone();
    doc.info.version = config.app.version.clone();
    doc.info.description = Some(format!(
        "{} ({} environment)",
        config.app.name, config.app.environment
    ));
    doc
}

/// Swagger UI at `{prefix}/docs`, reading the document from `{prefix}/openapi.json`.
pub fn swagger_ui(config: &AppConfig) -> SwaggerUi {
    let prefix = config.app.api_prefix.as_str();
    SwaggerUi::new(under_prefix(prefix, DOCS_PATH))
        .url(under_prefix(prefix, OPENAPI_PATH), openapi(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_paths_carry_prefix() {
        let doc = openapi(&AppConfig::default());

        assert!(doc.paths.paths.contains_key("/"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/api/v1/health/ready"));
        assert!(doc.paths.paths.contains_key("/api/v1/stocks/info/{symbol}"));
        assert!(doc.paths.paths.contains_key("/api/v1/stocks/popular"));
        assert!(!doc.paths.paths.contains_key("/stocks/popular"));
    }

    #[test]
    fn root_prefix_keeps_paths_bare() {
        let mut config = AppConfig::default();
        config.app.api_prefix = "/".to_string();
        let doc = openapi(&config);

        assert!(doc.paths.paths.contains_key("/stocks/info/{symbol}"));
        assert!(doc.paths.paths.contains_key("/health/live"));
        assert_eq!(under_prefix("/", OPENAPI_PATH), "/openapi.json");
    }

    #[test]
    fn info_follows_config() {
        let mut config = AppConfig::default();
        config.app.name = "Quotes".to_string();
        config.app.version = "2.0".to_string();
        let doc = openapi(&config);

        assert_eq!(doc.info.title, "Quotes");
        assert_eq!(doc.info.version, "2.0");
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("StockInfo"));
        assert!(schemas.contains_key("ErrorDetail"));
    }
}
