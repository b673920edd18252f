use std::time::Duration;

use fiche_core::error::CoreError;

/// Errors from a single backend call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The configured base URL cannot carry a template id.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Backend call was cancelled")]
    Cancelled,
}

/// Errors from an editor controller operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The editor refused the transition before any network call.
    #[error(transparent)]
    Editor(#[from] CoreError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
