use std::sync::Arc;
use std::time::Duration;

use crate::services::orchestrator::Generator;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
    /// Client used by the diagnostic reachability probe route.
    pub http: reqwest::Client,
    pub probe_timeout: Duration,
    pub store_configured: bool,
}

impl AppState {
    pub fn new(generator: Generator, probe_timeout: Duration, store_configured: bool) -> Self {
        Self {
            generator: Arc::new(generator),
            http: reqwest::Client::new(),
            probe_timeout,
            store_configured,
        }
    }
}
