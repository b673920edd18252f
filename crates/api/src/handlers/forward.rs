//! The gateway's single forwarding handler.
//!
//! Each request issues exactly one upstream call with the same method, path
//! (minus the `/api` prefix), query string and JSON body. There are no
//! retries. Dropping the handler future (client disconnect, gateway timeout)
//! aborts the upstream call.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{ProxyError, ProxyResult};
use crate::state::AppState;

/// Prefix stripped before forwarding.
pub const API_PREFIX: &str = "/api";

/// Backend path for an incoming gateway path.
///
/// `/api/templates` becomes `/templates`; paths without the prefix are
/// forwarded unchanged.
pub fn upstream_path(path: &str) -> &str {
    match path.strip_prefix(API_PREFIX) {
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Full upstream URL including the query string.
pub fn upstream_url(backend_url: &str, uri: &Uri) -> String {
    let mut url = format!("{backend_url}{}", upstream_path(uri.path()));
    if let Some(query) = uri.query() {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Forward one request to the backend and relay its JSON answer.
pub async fn forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> ProxyResult<Response> {
    let url = upstream_url(&state.config.backend_url, &uri);
    tracing::debug!(%method, upstream = %url, "Forwarding request");

    let mut request = state.http.request(method.clone(), &url);
    if !body.is_empty() {
        let json: serde_json::Value =
            serde_json::from_slice(&body).map_err(ProxyError::InvalidBody)?;
        request = request.json(&json);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProxyError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    tracing::debug!(%method, upstream = %url, status = status.as_u16(), "Backend answered");
    if bytes.is_empty() {
        return Ok(status.into_response());
    }

    let json: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(ProxyError::MalformedResponse)?;
    Ok((status, Json(json)).into_response())
}
