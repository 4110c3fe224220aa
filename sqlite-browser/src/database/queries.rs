//! SQL text for every statement the repository issues
//!
//! Pure string assembly. Identifiers arrive already quoted as
//! [`QuotedIdentifier`]; values are always `?` placeholders bound by the caller.

use crate::identifier::QuotedIdentifier;
use crate::schema::RelationKind;

/// Implicit SQLite row identifier used for default ordering and tiebreaking
pub const ROWID: &str = "rowid";

/// Tables, excluding SQLite's internal `sqlite_*` objects
pub const LIST_TABLES: &str =
    "SELECT name, sql FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

pub const LIST_VIEWS: &str =
    "SELECT name, sql FROM sqlite_master WHERE type = 'view' ORDER BY name";

/// Binds: kind, name. Internal `sqlite_*` objects never count as existing.
pub const OBJECT_EXISTS: &str =
    "SELECT 1 FROM sqlite_master WHERE type = ? AND name = ? AND name NOT LIKE 'sqlite_%'";

/// Catalog flag for `WITHOUT ROWID` tables (SQLite 3.37+). Binds: table name
pub const TABLE_LIST_WITHOUT_ROWID: &str =
    "SELECT wr FROM pragma_table_list WHERE schema = 'main' AND type = 'table' AND name = ?";

/// Position of the `without rowid` marker in the stored definition, 0 if absent.
/// Binds: table name
///
/// Heuristic: a comment or column name containing the phrase also matches.
pub const CHECK_WITHOUT_ROWID: &str =
    "SELECT instr(lower(sql), 'without rowid') FROM sqlite_master WHERE type = 'table' AND name = ?";

pub fn list_relations(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::Table => LIST_TABLES,
        RelationKind::View => LIST_VIEWS,
    }
}

pub fn count_all(quoted_name: &QuotedIdentifier) -> String {
    format!("SELECT COUNT(*) FROM {}", quoted_name)
}

/// Zero-row select, prepared only to read the result column names
pub fn select_schema_only(quoted_name: &QuotedIdentifier) -> String {
    format!("SELECT * FROM {} LIMIT 0", quoted_name)
}

/// A page select together with the values its placeholders take
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub sql: String,

    /// First placeholder
    pub take: i64,

    /// Second placeholder
    pub offset: i64,
}

/// Build the SELECT for one page of rows
///
/// `ORDER BY <column> ASC|DESC[, rowid]` when a column is given, `ORDER BY rowid`
/// when only the tiebreaker is requested, no ORDER BY otherwise.
pub fn select_page(
    quoted_name: &QuotedIdentifier,
    order_column: Option<&QuotedIdentifier>,
    descending: bool,
    add_rowid_tiebreaker: bool,
    take: i64,
    offset: i64,
) -> PageQuery {
    let mut sql = format!("SELECT * FROM {}", quoted_name);

    match order_column {
        Some(column) => {
            sql.push_str(" ORDER BY ");
            sql.push_str(column.as_str());
            sql.push_str(if descending { " DESC" } else { " ASC" });

            if add_rowid_tiebreaker {
                sql.push_str(", ");
                sql.push_str(ROWID);
            }
        }
        None if add_rowid_tiebreaker => {
            sql.push_str(" ORDER BY ");
            sql.push_str(ROWID);
        }
        None => {}
    }

    sql.push_str(" LIMIT ? OFFSET ?");

    PageQuery { sql, take, offset }
}
