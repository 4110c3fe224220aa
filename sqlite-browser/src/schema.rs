//! Request and response types for relation browsing
//!
//! These types are built per request and never cached.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind of relation being browsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Table,
    View,
}

impl RelationKind {
    /// Value of the `type` column in `sqlite_master`
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Table => "table",
            RelationKind::View => "view",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Table => formatter.write_str("Table"),
            RelationKind::View => formatter.write_str("View"),
        }
    }
}

/// A table or view, as reported by a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDescriptor {
    /// Relation name exactly as stored in the catalog
    pub name: String,

    /// Best-effort row count (0 when counting failed)
    pub row_count: i64,

    /// Column names in declaration order (empty when introspection failed)
    pub columns: Vec<String>,
}

/// Response from listing tables or views
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Query parameters for fetching one page of a relation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based page number, clamped into range
    #[serde(default = "default_page")]
    pub page: i64,

    /// Rows per page, clamped into range
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Column name to sort by
    pub sort_by: Option<String>,

    /// "asc" or "desc", case-insensitive
    pub sort_dir: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            sort_by: None,
            sort_dir: None,
        }
    }
}

/// One page of rows together with the normalized window it was read with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<R = Row> {
    #[serde(rename = "type")]
    pub kind: RelationKind,

    /// Relation name as requested
    pub name: String,

    pub page: i64,
    pub page_size: i64,
    pub total_rows: i64,

    /// `max(1, ceil(total_rows / page_size))`
    pub total_pages: i64,

    pub rows: Vec<R>,
}

/// A column name that compares and hashes ASCII case-insensitively,
/// matching how SQLite resolves identifiers
#[derive(Debug, Clone)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The spelling this name was created with
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq for ColumnName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for ColumnName {}

impl Hash for ColumnName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A single cell value
///
/// Binary values are carried as base64 text; nothing else is transformed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Binary(String),
}

/// A result row keyed by case-insensitive column name
///
/// Column order is preserved. A NULL cell is stored as [`CellValue::Null`],
/// never as a missing key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(ColumnName, CellValue)>,
}

impl Row {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Set a cell, replacing any existing cell whose name matches case-insensitively
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        let column = ColumnName::new(column);
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name.matches(column))
            .map(|(_, value)| value)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnName, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name, value))
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut row = Row::default();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}
