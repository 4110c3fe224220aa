//! Sort resolution against a relation's actual schema

use crate::database::traits::RelationRepository;
use crate::identifier::{self, QuotedIdentifier};
use crate::schema::{ColumnName, RelationKind};
use crate::{Error, Result};
use tracing::debug;

/// Sort order for row queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse "asc" or "desc" case-insensitively; absent means ascending
    pub fn parse(direction: Option<&str>) -> Result<Self> {
        match direction {
            None => Ok(SortDirection::Ascending),
            Some(value) if value.eq_ignore_ascii_case("asc") => Ok(SortDirection::Ascending),
            Some(value) if value.eq_ignore_ascii_case("desc") => Ok(SortDirection::Descending),
            Some(value) => Err(Error::InvalidArgument(format!(
                "sortDir must be 'asc' or 'desc', got '{value}'."
            ))),
        }
    }
}

/// How one page request is ordered
///
/// Resolved per request; never cached, since columns and rowid-ness can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPlan {
    /// Primary sort column, quoted with the schema's spelling
    pub order_column: Option<QuotedIdentifier>,

    pub descending: bool,

    /// Append `rowid` as a final sort key
    pub add_rowid_tiebreaker: bool,
}

/// Resolve the requested sort against the relation
///
/// Without a sort column, tables that have a rowid are ordered by it and
/// views are left unordered. With a sort column, the name must be a safe
/// identifier and match a column of the relation case-insensitively; the
/// schema's exact spelling is what gets quoted. Tables with a rowid always
/// get it appended as a tiebreaker.
///
/// # Arguments
///
/// * `repository` - Source of column names and rowid-ness
/// * `quoted_name` - The relation name, already validated and quoted
/// * `kind` - Table or view
/// * `sort_column` - Requested column; blank counts as absent
/// * `sort_direction` - "asc" or "desc", absent means ascending
/// * `raw_name` - The relation name as requested, for catalog lookups and messages
pub async fn build_sort_plan<R>(
    repository: &R,
    quoted_name: &QuotedIdentifier,
    kind: RelationKind,
    sort_column: Option<&str>,
    sort_direction: Option<&str>,
    raw_name: &str,
) -> Result<SortPlan>
where
    R: RelationRepository + ?Sized,
{
    let descending = SortDirection::parse(sort_direction)? == SortDirection::Descending;

    let Some(requested) = sort_column.filter(|column| !column.trim().is_empty()) else {
        let add_rowid_tiebreaker = has_stable_rowid(repository, kind, raw_name).await?;
        return Ok(SortPlan {
            order_column: None,
            descending,
            add_rowid_tiebreaker,
        });
    };

    identifier::ensure_valid(requested)?;

    let requested_name = ColumnName::new(requested);
    let columns = repository.get_column_names(quoted_name).await?;
    let matched = columns
        .into_iter()
        .map(ColumnName::new)
        .find(|column| *column == requested_name)
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Column '{requested}' does not exist on \"{raw_name}\"."
            ))
        })?;

    let add_rowid_tiebreaker = has_stable_rowid(repository, kind, raw_name).await?;

    let plan = SortPlan {
        order_column: Some(identifier::quote(matched.as_str())),
        descending,
        add_rowid_tiebreaker,
    };
    debug!(relation = raw_name, ?plan, "resolved sort plan");

    Ok(plan)
}

async fn has_stable_rowid<R>(repository: &R, kind: RelationKind, raw_name: &str) -> Result<bool>
where
    R: RelationRepository + ?Sized,
{
    match kind {
        RelationKind::View => Ok(false),
        RelationKind::Table => Ok(!repository.is_without_rowid(raw_name).await?),
    }
}
