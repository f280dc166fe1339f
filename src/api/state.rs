//! API server state

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::health::{run_checks, ComponentCheck, DatabaseCheck};
use crate::stock::{MockStockProvider, StockProvider};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Settings snapshot, read-only after startup
    pub config: Arc<AppConfig>,

    /// Source of stock quotes
    pub stocks: Arc<dyn StockProvider>,

    /// Components consulted by the health and readiness endpoints
    pub checks: Arc<Vec<Arc<dyn ComponentCheck>>>,
}

impl AppState {
    /// State with the reference stock table and the database placeholder check
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_components(
            config,
            Arc::new(MockStockProvider::reference()),
            vec![Arc::new(DatabaseCheck)],
        )
    }

    /// State with caller-supplied collaborators
    pub fn with_components(
        config: Arc<AppConfig>,
        stocks: Arc<dyn StockProvider>,
        checks: Vec<Arc<dyn ComponentCheck>>,
    ) -> Self {
        Self {
            config,
            stocks,
            checks: Arc::new(checks),
        }
    }

    /// Current result of every component check
    pub async fn component_status(&self) -> BTreeMap<String, bool> {
        run_checks(&self.checks).await
    }
}
