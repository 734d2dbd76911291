// Health check service implementation

use serde::Serialize;

use crate::handlers::AppState;

/// Readiness of the service's backing systems
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub database: bool,
    /// Latest block seen by the node, `None` when unreachable
    pub chain_block: Option<u64>,
}

impl HealthReport {
    /// The database is required; the chain is reported but not required
    pub fn is_ready(&self) -> bool {
        self.database
    }
}

pub struct HealthChecker<'a> {
    state: &'a AppState,
}

impl<'a> HealthChecker<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn check(&self) -> HealthReport {
        let database = self.state.repositories.ping().await;
        let chain_block = match self.state.contract.latest_block().await {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!("Health: chain unreachable: {}", e);
                None
            }
        };

        HealthReport {
            database,
            chain_block,
        }
    }
}
