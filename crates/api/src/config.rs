/// Backend address used when `BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Deployments
/// point `BACKEND_URL` at a loopback or service-name address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Whole-request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    /// Backend base URL without a trailing slash.
    pub backend_url: String,
    /// Timeout for one upstream call in seconds (default: `60`).
    pub backend_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    /// | `BACKEND_URL`          | `http://localhost:8000`    |
    /// | `BACKEND_TIMEOUT_SECS` | `60`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let backend_url = normalize_backend_url(
            &std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into()),
        );

        let backend_timeout_secs: u64 = std::env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("BACKEND_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            backend_url,
            backend_timeout_secs,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trim surrounding whitespace and trailing slashes; empty falls back to the default.
pub fn normalize_backend_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BACKEND_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
