//! Relation repository trait
//!
//! Every method is an independent, side-effect-free read. Implementations
//! acquire a connection per call and hold no state between calls.

use crate::identifier::QuotedIdentifier;
use crate::schema::{RelationDescriptor, RelationKind, Row};
use crate::sort::SortPlan;
use async_trait::async_trait;
use thiserror::Error;

/// Read access to the relations of one database
#[async_trait]
pub trait RelationRepository: Send + Sync + 'static {
    /// List all tables or all views, ordered by name
    ///
    /// Row counts and column lists are best-effort: a relation whose metadata
    /// cannot be read is reported with 0 rows and no columns.
    async fn list_relations(&self, kind: RelationKind)
        -> Result<Vec<RelationDescriptor>, DatabaseError>;

    /// Check whether a relation of the given kind exists
    ///
    /// # Arguments
    ///
    /// * `kind` - Table or view
    /// * `name` - Raw (unquoted) relation name; bound as a parameter
    async fn object_exists(&self, kind: RelationKind, name: &str) -> Result<bool, DatabaseError>;

    /// Total row count of a relation
    async fn count_rows(&self, quoted_name: &QuotedIdentifier) -> Result<i64, DatabaseError>;

    /// Column names of a relation, in declaration order, without reading rows
    async fn get_column_names(
        &self,
        quoted_name: &QuotedIdentifier,
    ) -> Result<Vec<String>, DatabaseError>;

    /// Whether a table was declared `WITHOUT ROWID`
    ///
    /// # Arguments
    ///
    /// * `table_name` - Raw (unquoted) table name; bound as a parameter
    async fn is_without_rowid(&self, table_name: &str) -> Result<bool, DatabaseError>;

    /// Fetch one page of rows in the order described by `plan`
    ///
    /// Binary cells are returned base64-encoded and NULL cells as explicit nulls.
    async fn get_page(
        &self,
        quoted_name: &QuotedIdentifier,
        plan: &SortPlan,
        take: i64,
        offset: i64,
    ) -> Result<Vec<Row>, DatabaseError>;
}

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Generic database error
    #[error("Database error: {0}")]
    Query(String),

    /// A cell could not be converted into a row value
    #[error("Cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::Query(error.to_string())
    }
}
