//! # sqlite-browser
//!
//! Read-only HTTP browsing of SQLite tables and views, easily integrable as an Axum router.
//!
//! ## Features
//!
//! - Lists tables and views with best-effort row counts and column names
//! - Pages through rows with clamped, always-valid page windows
//! - Optional sorting by any column of the relation, with a rowid tiebreaker
//!   so pages never shift when sort values tie
//! - Untrusted names are validated against a strict identifier pattern and
//!   quoted before they reach SQL text; paging values are always bound parameters
//!
//! ## Security Warning
//!
//! There is no write access and no raw SQL, but there is also no authentication.
//! Everything in the database is readable by whoever can reach the router.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use sqlite_browser::SqlBrowserLayer;
//! use sqlx::SqlitePool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = SqlitePool::connect("sqlite:./data/app.db")
//!         .await
//!         .unwrap();
//!
//!     let app = Router::new()
//!         .route("/", get(|| async { "Hello, World!" }))
//!         .merge(SqlBrowserLayer::sqlite("/sqlite-browser", pool).into_router());
//!
//!     // Serve the application...
//! }
//! ```

// Public modules
pub mod api;
pub mod database;
pub mod identifier;
pub mod layer;
pub mod pagination;
pub mod schema;
pub mod service;
pub mod sort;

#[cfg(test)]
pub(crate) mod test_support;

// Public exports
pub use layer::SqlBrowserLayer;
pub use schema::{
    CellValue, ColumnName, ListResponse, PageRequest, PageResult, RelationDescriptor,
    RelationKind, Row,
};
pub use service::BrowsingService;

// Re-export the repository seam
pub use database::traits::{DatabaseError, RelationRepository};

#[cfg(feature = "sqlite")]
pub use database::sqlite::SqliteRepository;

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced to callers of the browsing service
#[derive(Debug, Error)]
pub enum Error {
    /// A relation or column name failed the safe-identifier pattern
    #[error("Invalid identifier: {name:?}")]
    InvalidIdentifier { name: String },

    /// A sort column or direction the relation cannot satisfy
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The named table or view does not exist
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: RelationKind, name: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl Error {
    /// HTTP status the error should be reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidIdentifier { .. } | Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
