use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: `reqwest::Client` is a handle to a shared pool.
#[derive(Clone)]
pub struct AppState {
    /// Upstream HTTP client, bounded by `backend_timeout_secs`.
    pub http: reqwest::Client,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }
}
