//! Paths forwarded to the backend.
//!
//! ```text
//! ANY /api/{*path}                    -> /{path}
//! ANY /templates                      -> /templates
//! ANY /templates/{*rest}              -> /templates/{rest}
//! ANY /generate-product-description   -> /generate-product-description
//! ANY /generate-with-rag              -> /generate-with-rag
//! ANY /client-data                    -> /client-data
//! ANY /client-data/{*rest}            -> /client-data/{rest}
//! ```

use axum::routing::any;
use axum::Router;

use crate::handlers::forward;
use crate::state::AppState;

pub const FORWARDED_PATHS: &[&str] = &[
    "/api/{*path}",
    "/templates",
    "/templates/{*rest}",
    "/generate-product-description",
    "/generate-with-rag",
    "/client-data",
    "/client-data/{*rest}",
];

/// Every forwarded path, all bound to the same handler.
pub fn router() -> Router<AppState> {
    FORWARDED_PATHS
        .iter()
        .fold(Router::new(), |router, path| {
            router.route(path, any(forward::forward))
        })
}
