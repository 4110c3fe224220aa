//! SqlBrowserLayer - Main Axum integration layer
//!
//! This module provides the main entry point for mounting the relation
//! browser into an Axum application.

use crate::database::traits::RelationRepository;
use crate::service::BrowsingService;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[cfg(feature = "sqlite")]
use crate::database::sqlite::SqliteRepository;

use crate::api::create_api_router;

/// Main layer for integrating the relation browser into an Axum application
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use sqlite_browser::SqlBrowserLayer;
/// use sqlx::SqlitePool;
///
/// # async fn example() {
/// let pool = SqlitePool::connect("sqlite:./data/app.db").await.unwrap();
/// let browser = SqlBrowserLayer::sqlite("/sqlite-browser", pool);
/// let app = Router::new().merge(browser.into_router());
/// # }
/// ```
pub struct SqlBrowserLayer<R: RelationRepository> {
    base_path: String,
    service: Arc<BrowsingService<R>>,
}

impl<R: RelationRepository> SqlBrowserLayer<R> {
    /// Create a new relation browser at the given base path
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the browser will be mounted (e.g., "/sqlite-browser")
    /// * `repository` - The relation repository implementation
    pub fn new(base_path: impl Into<String>, repository: R) -> Self {
        Self {
            base_path: base_path.into(),
            service: Arc::new(BrowsingService::new(repository)),
        }
    }

    /// Convert into an Axum Router that can be merged
    ///
    /// The returned router serves the API endpoints at `{base_path}/api/*`
    /// with request tracing and permissive CORS. A missing leading slash on
    /// `base_path` is added.
    pub fn into_router(self) -> Router {
        let api_prefix = api_prefix(&self.base_path);
        let api_router = create_api_router(self.service);

        Router::new()
            .nest(&api_prefix, api_router)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }
}

#[cfg(feature = "sqlite")]
impl SqlBrowserLayer<SqliteRepository> {
    /// Create a new relation browser for SQLite
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the browser will be mounted
    /// * `pool` - The SQLite connection pool
    pub fn sqlite(base_path: impl Into<String>, pool: sqlx::SqlitePool) -> Self {
        Self::new(base_path, SqliteRepository::new(pool))
    }
}

/// `{base_path}/api` with exactly one leading slash and no doubled separators
fn api_prefix(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/api".to_string()
    } else {
        format!("/{}/api", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingRepository;

    #[test]
    fn test_api_prefix_normalization() {
        assert_eq!(api_prefix("/sqlite-browser"), "/sqlite-browser/api");
        assert_eq!(api_prefix("db"), "/db/api");
        assert_eq!(api_prefix("/db/"), "/db/api");
        assert_eq!(api_prefix("admin/db"), "/admin/db/api");
        assert_eq!(api_prefix(""), "/api");
        assert_eq!(api_prefix("/"), "/api");
    }

    #[test]
    fn test_router_builds_without_leading_slash() {
        let _router = SqlBrowserLayer::new("db", RecordingRepository::new()).into_router();
    }
}
