use std::time::Duration;

/// Default backend address when `BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    /// Upper bound for a single backend call.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `BACKEND_URL`          | `http://localhost:8000` |
    /// | `BACKEND_TIMEOUT_SECS` | `60`                    |
    pub fn from_env() -> Self {
        let base_url = std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());

        let timeout_secs: u64 = std::env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("BACKEND_TIMEOUT_SECS must be a valid u64");

        Self::new(base_url, Duration::from_secs(timeout_secs))
    }

    /// A blank `base_url` falls back to [`DEFAULT_BACKEND_URL`].
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            timeout,
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BACKEND_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
