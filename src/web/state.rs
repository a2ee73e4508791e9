use std::sync::Arc;

use crate::orchestrator::Orchestrator;

use super::config::Config;

/// Shared handler state: the loaded configuration (API keys included) and
/// the orchestrator that owns every schedule-request operation.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<Orchestrator>,
}
