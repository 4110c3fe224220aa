//! Recording repository for exercising the service pipeline without a database

use crate::database::traits::{DatabaseError, RelationRepository};
use crate::identifier::QuotedIdentifier;
use crate::schema::{RelationDescriptor, RelationKind, Row};
use crate::sort::SortPlan;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListRelations(RelationKind),
    ObjectExists(RelationKind, String),
    CountRows(String),
    GetColumnNames(String),
    IsWithoutRowId(String),
    GetPage {
        quoted_name: String,
        plan: SortPlan,
        take: i64,
        offset: i64,
    },
}

pub struct RecordingRepository {
    exists: bool,
    row_count: i64,
    columns: Vec<String>,
    without_rowid: bool,
    rows: Vec<Row>,
    relations: Vec<RelationDescriptor>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingRepository {
    /// An existing table with a rowid, no rows and no columns
    pub fn new() -> Self {
        Self {
            exists: true,
            row_count: 0,
            columns: Vec::new(),
            without_rowid: false,
            rows: Vec::new(),
            relations: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn missing(mut self) -> Self {
        self.exists = false;
        self
    }

    pub fn with_row_count(mut self, row_count: i64) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|column| column.to_string()).collect();
        self
    }

    pub fn without_rowid(mut self) -> Self {
        self.without_rowid = true;
        self
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_relations(mut self, relations: Vec<RelationDescriptor>) -> Self {
        self.relations = relations;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RelationRepository for RecordingRepository {
    async fn list_relations(
        &self,
        kind: RelationKind,
    ) -> Result<Vec<RelationDescriptor>, DatabaseError> {
        self.record(Call::ListRelations(kind));
        Ok(self.relations.clone())
    }

    async fn object_exists(&self, kind: RelationKind, name: &str) -> Result<bool, DatabaseError> {
        self.record(Call::ObjectExists(kind, name.to_string()));
        Ok(self.exists)
    }

    async fn count_rows(&self, quoted_name: &QuotedIdentifier) -> Result<i64, DatabaseError> {
        self.record(Call::CountRows(quoted_name.to_string()));
        Ok(self.row_count)
    }

    async fn get_column_names(
        &self,
        quoted_name: &QuotedIdentifier,
    ) -> Result<Vec<String>, DatabaseError> {
        self.record(Call::GetColumnNames(quoted_name.to_string()));
        Ok(self.columns.clone())
    }

    async fn is_without_rowid(&self, table_name: &str) -> Result<bool, DatabaseError> {
        self.record(Call::IsWithoutRowId(table_name.to_string()));
        Ok(self.without_rowid)
    }

    async fn get_page(
        &self,
        quoted_name: &QuotedIdentifier,
        plan: &SortPlan,
        take: i64,
        offset: i64,
    ) -> Result<Vec<Row>, DatabaseError> {
        self.record(Call::GetPage {
            quoted_name: quoted_name.to_string(),
            plan: plan.clone(),
            take,
            offset,
        });
        Ok(self.rows.clone())
    }
}
