use std::error::Error as _;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Human message carried in the `error` field of every gateway failure.
pub const PROXY_ERROR_MESSAGE: &str = "Backend request failed";

/// Failure while forwarding one request to the backend.
///
/// Every variant renders the same `{error, details, stack}` body with status
/// 500; only `details` and `stack` tell the causes apart.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The incoming body is not valid JSON.
    #[error("Request body is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// Transport failure or upstream timeout.
    #[error("Backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Backend responded with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The backend answered 2xx with a body that is not JSON.
    #[error("Backend response is not valid JSON: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

/// Convenience type alias for handler return values.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    /// The error followed by its sources, one per line.
    pub fn stack(&self) -> String {
        let mut lines = vec![self.to_string()];
        let mut source = self.source();
        while let Some(cause) = source {
            lines.push(cause.to_string());
            source = cause.source();
        }
        lines.join("\n")
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let details = self.to_string();
        tracing::error!(error = %details, "Proxy request failed");

        let body = json!({
            "error": PROXY_ERROR_MESSAGE,
            "details": details,
            "stack": self.stack(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
