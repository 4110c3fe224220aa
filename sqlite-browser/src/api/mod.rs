//! REST API endpoints
//!
//! Thin adapters from HTTP onto [`BrowsingService`]; all validation happens
//! in the service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::database::traits::RelationRepository;
use crate::service::BrowsingService;
use crate::Error;

pub mod relations;

// Re-export handlers for convenience
pub use relations::{
    get_table_page_handler, get_view_page_handler, list_tables_handler, list_views_handler,
};

/// Create the API router with all endpoints
///
/// # Arguments
///
/// * `service` - Arc-wrapped browsing service
///
/// # Returns
///
/// An Axum Router configured with all API routes
pub fn create_api_router<R: RelationRepository>(service: Arc<BrowsingService<R>>) -> Router {
    // Note: Axum 0.8 uses {param} syntax instead of :param
    Router::new()
        .route("/tables", get(list_tables_handler::<R>))
        .route("/tables/{name}", get(get_table_page_handler::<R>))
        .route("/views", get(list_views_handler::<R>))
        .route("/views/{name}", get(get_view_page_handler::<R>))
        .with_state(service)
}

/// Render a service error as `{ "error": message }` with its status code
pub(crate) fn error_response(failure: Error) -> Response {
    let status = failure.status_code();

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %failure, "request failed");
    } else {
        info!(error = %failure, %status, "request rejected");
    }

    (
        status,
        Json(serde_json::json!({
            "error": failure.to_string()
        })),
    )
        .into_response()
}
