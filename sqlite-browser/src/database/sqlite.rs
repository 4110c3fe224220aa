//! SQLite relation repository

use crate::database::queries;
use crate::database::traits::{DatabaseError, RelationRepository};
use crate::identifier::{self, QuotedIdentifier};
use crate::schema::{CellValue, RelationDescriptor, RelationKind, Row};
use crate::sort::SortPlan;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Executor, Row as _, SqlitePool, Statement, TypeInfo, ValueRef};
use tracing::{debug, warn};

/// SQLite relation repository
///
/// Every call acquires its own connection from the pool and releases it when
/// the call returns (or its future is dropped).
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Create a new SQLite repository
    ///
    /// # Arguments
    ///
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn count_on(
        connection: &mut SqliteConnection,
        quoted_name: &QuotedIdentifier,
    ) -> Result<i64, DatabaseError> {
        let sql = queries::count_all(quoted_name);
        debug!(%sql, "counting rows");
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *connection).await?;
        Ok(count)
    }

    /// Prepare the zero-row select and read its result columns
    async fn column_names_on(
        connection: &mut SqliteConnection,
        quoted_name: &QuotedIdentifier,
    ) -> Result<Vec<String>, DatabaseError> {
        let sql = queries::select_schema_only(quoted_name);
        let statement = (&mut *connection).prepare(sql.as_str()).await?;
        Ok(statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect())
    }

    /// Look for the `without rowid` marker in the stored table definition
    ///
    /// Matches case-insensitively anywhere in the text, so the phrase inside a
    /// comment or a column name is a false positive. A missing table is `false`.
    async fn without_rowid_by_definition(
        connection: &mut SqliteConnection,
        table_name: &str,
    ) -> Result<bool, DatabaseError> {
        let marker_position: Option<Option<i64>> =
            sqlx::query_scalar(queries::CHECK_WITHOUT_ROWID)
                .bind(table_name)
                .fetch_optional(&mut *connection)
                .await?;

        Ok(matches!(marker_position, Some(Some(position)) if position > 0))
    }

    /// Convert a SQLite row into a case-insensitive [`Row`]
    fn convert_row(row: &SqliteRow) -> Result<Row, DatabaseError> {
        let mut converted = Row::with_capacity(row.len());

        for column in row.columns() {
            let value = Self::extract_cell(row, column.ordinal()).map_err(|error| {
                DatabaseError::Decode {
                    column: column.name().to_string(),
                    message: error.to_string(),
                }
            })?;
            converted.insert(column.name(), value);
        }

        Ok(converted)
    }

    /// Read one cell by its runtime storage class
    ///
    /// SQLite is dynamically typed, so the declared column type says little;
    /// the storage class of the value itself decides the conversion.
    fn extract_cell(row: &SqliteRow, index: usize) -> Result<CellValue, sqlx::Error> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(CellValue::Null);
        }

        let value = match raw.type_info().name() {
            "INTEGER" => CellValue::Integer(row.try_get(index)?),
            "REAL" => CellValue::Real(row.try_get(index)?),
            "BLOB" => {
                let bytes: Vec<u8> = row.try_get(index)?;
                CellValue::Binary(STANDARD.encode(bytes))
            }
            _ => CellValue::Text(row.try_get(index)?),
        };

        Ok(value)
    }
}

/// Collapse a failed metadata read to its default, keeping the listing alive
fn best_effort<T: Default>(result: Result<T, DatabaseError>, what: &str, relation: &str) -> T {
    result.unwrap_or_else(|error| {
        warn!(relation, %error, "{} unavailable, using default", what);
        T::default()
    })
}

#[async_trait]
impl RelationRepository for SqliteRepository {
    async fn list_relations(
        &self,
        kind: RelationKind,
    ) -> Result<Vec<RelationDescriptor>, DatabaseError> {
        let mut connection = self.pool.acquire().await?;

        let catalog: Vec<(String, Option<String>)> = sqlx::query_as(queries::list_relations(kind))
            .fetch_all(&mut *connection)
            .await?;

        let mut relations = Vec::with_capacity(catalog.len());
        for (name, _definition) in catalog {
            let quoted_name = identifier::quote(&name);

            let row_count = best_effort(
                Self::count_on(&mut connection, &quoted_name).await,
                "row count",
                &name,
            );
            let columns = best_effort(
                Self::column_names_on(&mut connection, &quoted_name).await,
                "column names",
                &name,
            );

            relations.push(RelationDescriptor {
                name,
                row_count,
                columns,
            });
        }

        debug!(%kind, count = relations.len(), "listed relations");
        Ok(relations)
    }

    async fn object_exists(&self, kind: RelationKind, name: &str) -> Result<bool, DatabaseError> {
        let mut connection = self.pool.acquire().await?;

        let exists: Option<i64> = sqlx::query_scalar(queries::OBJECT_EXISTS)
            .bind(kind.as_str())
            .bind(name)
            .fetch_optional(&mut *connection)
            .await?;

        Ok(exists.is_some())
    }

    async fn count_rows(&self, quoted_name: &QuotedIdentifier) -> Result<i64, DatabaseError> {
        let mut connection = self.pool.acquire().await?;
        Self::count_on(&mut connection, quoted_name).await
    }

    async fn get_column_names(
        &self,
        quoted_name: &QuotedIdentifier,
    ) -> Result<Vec<String>, DatabaseError> {
        let mut connection = self.pool.acquire().await?;
        Self::column_names_on(&mut connection, quoted_name).await
    }

    async fn is_without_rowid(&self, table_name: &str) -> Result<bool, DatabaseError> {
        let mut connection = self.pool.acquire().await?;

        let catalog_flag: Result<Option<i64>, sqlx::Error> =
            sqlx::query_scalar(queries::TABLE_LIST_WITHOUT_ROWID)
                .bind(table_name)
                .fetch_optional(&mut *connection)
                .await;

        match catalog_flag {
            Ok(flag) => return Ok(flag.is_some_and(|without_rowid| without_rowid != 0)),
            Err(error) => {
                debug!(%error, "pragma_table_list unavailable, inspecting table definition")
            }
        }

        Self::without_rowid_by_definition(&mut connection, table_name).await
    }

    async fn get_page(
        &self,
        quoted_name: &QuotedIdentifier,
        plan: &SortPlan,
        take: i64,
        offset: i64,
    ) -> Result<Vec<Row>, DatabaseError> {
        let query = queries::select_page(
            quoted_name,
            plan.order_column.as_ref(),
            plan.descending,
            plan.add_rowid_tiebreaker,
            take,
            offset,
        );
        debug!(sql = %query.sql, take, offset, "fetching page");

        let mut connection = self.pool.acquire().await?;
        let rows = sqlx::query(&query.sql)
            .bind(query.take)
            .bind(query.offset)
            .fetch_all(&mut *connection)
            .await?;

        rows.iter().map(Self::convert_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::quote;
    use sqlx::sqlite::SqlitePoolOptions;

    /// One connection, so every acquire sees the same in-memory database
    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn seeded_repository() -> SqliteRepository {
        let pool = memory_pool().await;
        for statement in [
            "CREATE TABLE people (id INTEGER PRIMARY KEY, Name TEXT NOT NULL, score REAL, avatar BLOB)",
            "INSERT INTO people (id, Name, score, avatar) VALUES (1, 'Carol', 7.5, x'00ff10')",
            "INSERT INTO people (id, Name, score, avatar) VALUES (2, 'alice', NULL, NULL)",
            "INSERT INTO people (id, Name, score, avatar) VALUES (3, 'Bob', 7.5, NULL)",
            "INSERT INTO people (id, Name, score, avatar) VALUES (4, 'Dave', 7.5, NULL)",
            "CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT) WITHOUT ROWID",
            "INSERT INTO settings VALUES ('theme', 'dark'), ('lang', 'en')",
            "CREATE TABLE notes (body TEXT /* not declared without rowid */)",
            "CREATE TABLE empty_table (id INTEGER)",
            "CREATE VIEW high_scores AS SELECT Name, score FROM people WHERE score > 5",
        ] {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        SqliteRepository::new(pool)
    }

    fn names(rows: &[Row]) -> Vec<CellValue> {
        rows.iter().map(|row| row.get("name").cloned().unwrap()).collect()
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[tokio::test]
    async fn test_list_tables() {
        let repository = seeded_repository().await;
        let tables = repository.list_relations(RelationKind::Table).await.unwrap();

        let listed: Vec<&str> = tables.iter().map(|table| table.name.as_str()).collect();
        assert_eq!(listed, vec!["empty_table", "notes", "people", "settings"]);

        let people = &tables[2];
        assert_eq!(people.row_count, 4);
        assert_eq!(people.columns, vec!["id", "Name", "score", "avatar"]);
    }

    #[tokio::test]
    async fn test_list_views_survives_broken_view() {
        let repository = seeded_repository().await;
        // Dropping the view's source table after creation leaves the view unusable.
        sqlx::query("CREATE TABLE gone (x INTEGER)")
            .execute(repository.pool())
            .await
            .unwrap();
        sqlx::query("CREATE VIEW broken AS SELECT x FROM gone")
            .execute(repository.pool())
            .await
            .unwrap();
        sqlx::query("DROP TABLE gone")
            .execute(repository.pool())
            .await
            .unwrap();

        let views = repository.list_relations(RelationKind::View).await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "broken");
        assert_eq!(views[0].row_count, 0);
        assert!(views[0].columns.is_empty());
        assert_eq!(views[1].name, "high_scores");
        assert_eq!(views[1].row_count, 3);
        assert_eq!(views[1].columns, vec!["Name", "score"]);
    }

    #[tokio::test]
    async fn test_object_exists_checks_kind() {
        let repository = seeded_repository().await;

        assert!(repository.object_exists(RelationKind::Table, "people").await.unwrap());
        assert!(!repository.object_exists(RelationKind::View, "people").await.unwrap());
        assert!(repository.object_exists(RelationKind::View, "high_scores").await.unwrap());
        assert!(!repository.object_exists(RelationKind::Table, "nobody").await.unwrap());
    }

    #[tokio::test]
    async fn test_without_rowid_detection() {
        let repository = seeded_repository().await;

        assert!(repository.is_without_rowid("settings").await.unwrap());
        assert!(!repository.is_without_rowid("people").await.unwrap());
        // The phrase inside a comment must not mislead the catalog lookup.
        assert!(!repository.is_without_rowid("notes").await.unwrap());
    }

    #[tokio::test]
    async fn test_without_rowid_by_definition_text() {
        let repository = seeded_repository().await;
        sqlx::query("CREATE TABLE counters (name TEXT PRIMARY KEY, hits INTEGER) without ROWID")
            .execute(repository.pool())
            .await
            .unwrap();
        let mut connection = repository.pool().acquire().await.unwrap();

        for (table, expected) in [
            ("counters", true),
            ("settings", true),
            ("people", false),
            ("missing", false),
            // Known false positive: the phrase only appears in a comment.
            ("notes", true),
        ] {
            let detected = SqliteRepository::without_rowid_by_definition(&mut connection, table)
                .await
                .unwrap();
            assert_eq!(detected, expected, "definition check for {table}");
        }
    }

    #[tokio::test]
    async fn test_get_page_converts_cells() {
        let repository = seeded_repository().await;
        let plan = SortPlan {
            order_column: None,
            descending: false,
            add_rowid_tiebreaker: true,
        };

        let rows = repository.get_page(&quote("people"), &plan, 2, 0).await.unwrap();

        assert_eq!(rows.len(), 2);
        let first = &rows[0];
        assert_eq!(first.get("ID"), Some(&CellValue::Integer(1)));
        assert_eq!(first.get("name"), Some(&text("Carol")));
        assert_eq!(first.get("score"), Some(&CellValue::Real(7.5)));
        assert_eq!(first.get("avatar"), Some(&CellValue::Binary("AP8Q".to_string())));

        let second = &rows[1];
        assert_eq!(second.get("score"), Some(&CellValue::Null));
        assert!(second.contains_column("avatar"));
    }

    #[tokio::test]
    async fn test_get_page_sort_with_tiebreaker_is_stable() {
        let repository = seeded_repository().await;
        let plan = SortPlan {
            order_column: Some(quote("score")),
            descending: true,
            add_rowid_tiebreaker: true,
        };

        let first_page = repository.get_page(&quote("people"), &plan, 2, 0).await.unwrap();
        let second_page = repository.get_page(&quote("people"), &plan, 2, 2).await.unwrap();

        assert_eq!(names(&first_page), vec![text("Carol"), text("Bob")]);
        assert_eq!(names(&second_page), vec![text("Dave"), text("alice")]);
    }

    #[tokio::test]
    async fn test_get_page_on_without_rowid_table() {
        let repository = seeded_repository().await;
        let plan = SortPlan {
            order_column: Some(quote("key")),
            descending: false,
            add_rowid_tiebreaker: false,
        };

        let rows = repository.get_page(&quote("settings"), &plan, 10, 0).await.unwrap();

        let keys: Vec<_> = rows.iter().map(|row| row.get("key").cloned().unwrap()).collect();
        assert_eq!(keys, vec![text("lang"), text("theme")]);
    }

    #[tokio::test]
    async fn test_metadata_reads() {
        let repository = seeded_repository().await;

        assert_eq!(repository.count_rows(&quote("empty_table")).await.unwrap(), 0);
        assert_eq!(repository.count_rows(&quote("high_scores")).await.unwrap(), 3);
        assert_eq!(
            repository.get_column_names(&quote("settings")).await.unwrap(),
            vec!["key", "value"]
        );
        assert!(repository.count_rows(&quote("nobody")).await.is_err());
    }
}
