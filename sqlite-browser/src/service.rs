//! Relation browsing pipeline
//!
//! Validate name, check existence, count, normalize paging, resolve sort,
//! fetch. Each step is its own round trip; nothing spans them.

use crate::database::traits::RelationRepository;
use crate::identifier;
use crate::pagination::paginate;
use crate::schema::{ListResponse, PageRequest, PageResult, RelationDescriptor, RelationKind};
use crate::sort::build_sort_plan;
use crate::{Error, Result};
use tracing::debug;

/// Answers "list relations" and "get one page of a relation"
pub struct BrowsingService<R> {
    repository: R,
}

impl<R: RelationRepository> BrowsingService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// List all tables or all views with best-effort row counts and columns
    pub async fn list_relations(
        &self,
        kind: RelationKind,
    ) -> Result<ListResponse<RelationDescriptor>> {
        let relations = self.repository.list_relations(kind).await?;
        Ok(ListResponse::from(relations))
    }

    /// Fetch one page of the named table or view
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidIdentifier`] - `name` or the sort column is not a safe identifier
    /// * [`Error::NotFound`] - no relation of this kind is called `name`
    /// * [`Error::InvalidArgument`] - unknown sort column or bad sort direction
    ///
    /// An empty relation short-circuits before sort resolution, so sort
    /// parameters are not checked against it.
    pub async fn get_relation_page(
        &self,
        kind: RelationKind,
        name: &str,
        request: &PageRequest,
    ) -> Result<PageResult> {
        identifier::ensure_valid(name)?;

        if !self.repository.object_exists(kind, name).await? {
            return Err(Error::NotFound {
                kind,
                name: name.to_string(),
            });
        }

        let quoted_name = identifier::quote(name);
        let total_rows = self.repository.count_rows(&quoted_name).await?;
        let pagination = paginate(request.page, request.page_size, total_rows);

        let mut result = PageResult {
            kind,
            name: name.to_string(),
            page: pagination.page,
            page_size: pagination.page_size,
            total_rows,
            total_pages: pagination.total_pages,
            rows: Vec::new(),
        };

        if total_rows == 0 {
            debug!(%kind, relation = name, "relation is empty, skipping fetch");
            return Ok(result);
        }

        let plan = build_sort_plan(
            &self.repository,
            &quoted_name,
            kind,
            request.sort_by.as_deref(),
            request.sort_dir.as_deref(),
            name,
        )
        .await?;

        result.rows = self
            .repository
            .get_page(&quoted_name, &plan, pagination.page_size, pagination.offset)
            .await?;

        Ok(result)
    }
}
