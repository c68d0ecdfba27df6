//! Core traits for content storage abstraction.
//!
//! This module defines the trait hierarchy that backends must implement:
//!
//! - [`ContentDefinitionStore`] - Part and type definition registry
//! - [`DocumentSession`] - Content item queries with batched, transactional saves
//! - [`VersionStore`] - Per-feature migration version counters

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    ContentItem, ContentPartDefinition, ContentPartDefinitionBuilder, ContentTypeDefinition,
    ContentTypeDefinitionBuilder, MigrationRecord,
};

/// Alteration applied to a part definition builder.
pub type PartAlteration<'a> = &'a (dyn Fn(&mut ContentPartDefinitionBuilder) + Send + Sync);

/// Alteration applied to a type definition builder.
pub type TypeAlteration<'a> = &'a (dyn Fn(&mut ContentTypeDefinitionBuilder) + Send + Sync);

/// Registry of named part and type definitions.
#[async_trait]
pub trait ContentDefinitionStore: Send + Sync {
    async fn list_type_definitions(&self) -> Result<Vec<ContentTypeDefinition>, AppError>;

    async fn list_part_definitions(&self) -> Result<Vec<ContentPartDefinition>, AppError>;

    async fn get_type_definition(
        &self,
        name: &str,
    ) -> Result<Option<ContentTypeDefinition>, AppError>;

    async fn get_part_definition(
        &self,
        name: &str,
    ) -> Result<Option<ContentPartDefinition>, AppError>;

    /// Creates or updates the part definition `name`.
    ///
    /// The alteration runs against the existing definition, or against an
    /// empty one when `name` is unknown.
    async fn alter_part_definition(
        &self,
        name: &str,
        alteration: PartAlteration<'_>,
    ) -> Result<(), AppError>;

    /// Creates or updates the type definition `name`.
    async fn alter_type_definition(
        &self,
        name: &str,
        alteration: TypeAlteration<'_>,
    ) -> Result<(), AppError>;

    /// Deletes the part definition `name` and detaches it from every type.
    ///
    /// Deleting an unknown part is a no-op.
    async fn delete_part_definition(&self, name: &str) -> Result<(), AppError>;
}

/// Filter applied when querying content item documents.
///
/// Results are always ordered by ascending document id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    /// Only documents with an id strictly greater than this.
    pub after: Option<u64>,
    /// Maximum number of documents returned.
    pub limit: Option<usize>,
}

/// Unit of work over content item documents.
///
/// Saves are staged until [`commit`](DocumentSession::commit) applies them as
/// one transaction. Queries only see committed documents.
#[async_trait]
pub trait DocumentSession: Send + Sync {
    /// Returns committed documents matching `filter`, ordered by document id.
    async fn query_documents(&self, filter: DocumentFilter) -> Result<Vec<ContentItem>, AppError>;

    /// Stages `item` for the next commit. Items with a zero document id are
    /// inserted and receive the next id.
    async fn save(&self, item: ContentItem) -> Result<(), AppError>;

    /// Applies all staged saves as a single transaction.
    async fn commit(&self) -> Result<(), AppError>;

    /// Discards all staged saves.
    async fn rollback(&self) -> Result<(), AppError>;
}

/// Persistent migration version counters, one per feature.
#[async_trait]
pub trait VersionStore: Send + Sync {
    async fn get_record(&self, feature: &str) -> Result<Option<MigrationRecord>, AppError>;

    async fn list_records(&self) -> Result<Vec<MigrationRecord>, AppError>;

    /// Persists `version` as the current version of `feature`.
    async fn record_version(
        &self,
        feature: &str,
        version: u32,
        migration_id: &str,
    ) -> Result<(), AppError>;

    /// Current version of `feature`, `None` when no step has run yet.
    async fn get_version(&self, feature: &str) -> Result<Option<u32>, AppError> {
        Ok(self.get_record(feature).await?.map(|r| r.version))
    }
}
