//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors;
use crate::state::AppState;

/// Path of the conversion endpoint.
pub(crate) const CONVERT_PATH: &str = "/api/text-to-docx";

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `max_body_bytes` - Request body size limit
pub(crate) fn create_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let convert_route = post(handlers::convert::convert)
        .options(handlers::convert::preflight)
        .fallback(handlers::convert::method_not_allowed);

    Router::new()
        .route(CONVERT_PATH, convert_route)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors::allow_credentials_layer())
                .layer(cors::allow_origin_layer())
                .layer(cors::allow_methods_layer())
                .layer(cors::allow_headers_layer())
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}
