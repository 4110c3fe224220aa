//! Relation listing and paging endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::error_response;
use crate::database::traits::RelationRepository;
use crate::schema::{PageRequest, RelationKind};
use crate::service::BrowsingService;
use crate::Error;

/// Handler for GET /api/tables
///
/// Returns `{ items, total }` with every table's name, row count and columns.
pub async fn list_tables_handler<R: RelationRepository>(
    State(service): State<Arc<BrowsingService<R>>>,
) -> Response {
    list_relations(&service, RelationKind::Table).await
}

/// Handler for GET /api/views
pub async fn list_views_handler<R: RelationRepository>(
    State(service): State<Arc<BrowsingService<R>>>,
) -> Response {
    list_relations(&service, RelationKind::View).await
}

/// Handler for GET /api/tables/{name}
///
/// Query parameters:
/// - page: 1-based page number (default: 1, clamped into range)
/// - pageSize: Rows per page (default: 50, clamped to 1..=1000)
/// - sortBy: Column name to sort by (optional)
/// - sortDir: "asc" or "desc" (optional, default: "asc")
///
/// Responds 400 for an unsafe name, a malformed query string or bad sort
/// input and 404 when the table does not exist.
pub async fn get_table_page_handler<R: RelationRepository>(
    State(service): State<Arc<BrowsingService<R>>>,
    Path(name): Path<String>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Response {
    get_relation_page(&service, RelationKind::Table, &name, query).await
}

/// Handler for GET /api/views/{name}
///
/// Same query parameters as [`get_table_page_handler`]. Views have no rowid,
/// so unsorted pages come back in whatever order the view produces.
pub async fn get_view_page_handler<R: RelationRepository>(
    State(service): State<Arc<BrowsingService<R>>>,
    Path(name): Path<String>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Response {
    get_relation_page(&service, RelationKind::View, &name, query).await
}

async fn list_relations<R: RelationRepository>(
    service: &BrowsingService<R>,
    kind: RelationKind,
) -> Response {
    match service.list_relations(kind).await {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(failure) => error_response(failure),
    }
}

async fn get_relation_page<R: RelationRepository>(
    service: &BrowsingService<R>,
    kind: RelationKind,
    name: &str,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Response {
    let request = match query {
        Ok(Query(request)) => request,
        Err(rejection) => return error_response(Error::InvalidArgument(rejection.body_text())),
    };

    match service.get_relation_page(kind, name, &request).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(failure) => error_response(failure),
    }
}
