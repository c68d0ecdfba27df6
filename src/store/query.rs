//! Query builder for fluent content item queries.

use crate::error::AppError;
use crate::models::ContentItem;
use crate::store::traits::{DocumentFilter, DocumentSession};

/// A builder for querying content item documents.
///
/// # Example
///
/// ```ignore
/// let batch = session.query().after(last_document_id).take(10).list().await?;
/// ```
pub struct DocumentQuery<'a, S: DocumentSession + ?Sized> {
    session: &'a S,
    filter: DocumentFilter,
}

impl<'a, S: DocumentSession + ?Sized> DocumentQuery<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self {
            session,
            filter: DocumentFilter::default(),
        }
    }

    /// Only return documents with an id strictly greater than `document_id`.
    pub fn after(mut self, document_id: u64) -> Self {
        self.filter.after = Some(document_id);
        self
    }

    /// Return at most `limit` documents.
    pub fn take(mut self, limit: usize) -> Self {
        self.filter.limit = Some(limit);
        self
    }

    /// Returns the filter this builder will execute.
    pub fn filter(&self) -> DocumentFilter {
        self.filter
    }

    /// Executes the query, ordered by ascending document id.
    pub async fn list(self) -> Result<Vec<ContentItem>, AppError> {
        self.session.query_documents(self.filter).await
    }

    /// Executes the query and returns the first document, if any.
    pub async fn first(self) -> Result<Option<ContentItem>, AppError> {
        Ok(self.take(1).list().await?.into_iter().next())
    }
}

/// Extension trait providing a convenient `query()` method on sessions.
pub trait SessionExt: DocumentSession {
    fn query(&self) -> DocumentQuery<'_, Self> {
        DocumentQuery::new(self)
    }
}

impl<S: DocumentSession + ?Sized> SessionExt for S {}
