use crate::collector::Collector;
use crate::session::Orchestrator;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Appends notes to the daily buffer
    pub collector: Arc<Collector>,

    /// Runs analyses
    pub orchestrator: Arc<Orchestrator>,

    /// Bearer token required on every route except `/health`
    pub auth_token: Option<String>,
}

impl AppState {
    pub fn new(collector: Arc<Collector>, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            collector,
            orchestrator,
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }
}
