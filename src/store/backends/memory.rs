//! In-memory store backend with optional JSON snapshot persistence.
//!
//! [`MemoryStore`] implements every storage trait over a single
//! [`StoreSnapshot`]. When opened with a path, each definition change,
//! version update and session commit rewrites the snapshot file (written to a
//! sibling temp file, then renamed over the original).
//!
//! # Example
//!
//! ```ignore
//! use content_migrate::store::backends::memory::MemoryStore;
//! use content_migrate::store::{DocumentSession, SessionExt};
//!
//! let store = MemoryStore::open("content-store.json").await?;
//! let batch = store.query().after(0).take(10).list().await?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};

use crate::error::AppError;
use crate::models::{
    ContentItem, ContentPartDefinition, ContentPartDefinitionBuilder, ContentTypeDefinition,
    ContentTypeDefinitionBuilder, MigrationRecord,
};
use crate::store::traits::{
    ContentDefinitionStore, DocumentFilter, DocumentSession, PartAlteration, TypeAlteration,
    VersionStore,
};

/// Everything the store holds, in its persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub part_definitions: Vec<ContentPartDefinition>,
    #[serde(default)]
    pub type_definitions: Vec<ContentTypeDefinition>,
    /// Sorted by ascending document id.
    #[serde(default)]
    pub documents: Vec<ContentItem>,
    #[serde(default)]
    pub migrations: Vec<MigrationRecord>,
}

impl StoreSnapshot {
    fn next_document_id(&self) -> u64 {
        self.documents.last().map_or(1, |d| d.document_id + 1)
    }

    fn document_index(&self, document_id: u64) -> Option<usize> {
        self.documents
            .binary_search_by_key(&document_id, |d| d.document_id)
            .ok()
    }

    /// Restores the document ordering the session relies on.
    ///
    /// Documents are sorted by id. Documents without an id (zero) get the next
    /// free ids in file order. Duplicate ids are rejected.
    fn normalized(mut self) -> Result<Self, AppError> {
        let (mut documents, unassigned): (Vec<_>, Vec<_>) = std::mem::take(&mut self.documents)
            .into_iter()
            .partition(|d| !d.is_new());

        documents.sort_by_key(|d| d.document_id);
        if let Some(pair) = documents
            .windows(2)
            .find(|pair| pair[0].document_id == pair[1].document_id)
        {
            return Err(AppError::store(format!(
                "Duplicate content item document id {} in snapshot",
                pair[0].document_id
            )));
        }

        self.documents = documents;
        if !unassigned.is_empty() {
            tracing::warn!(
                "Assigning ids to {} content item document(s) without one",
                unassigned.len()
            );
        }
        for mut item in unassigned {
            item.document_id = self.next_document_id();
            self.documents.push(item);
        }

        Ok(self)
    }
}

/// Session activity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub queries: usize,
    pub saves: usize,
    pub commits: usize,
}

/// Store backend keeping all state in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreSnapshot>,
    pending: Mutex<Vec<ContentItem>>,
    path: Option<PathBuf>,
    queries: AtomicUsize,
    saves: AtomicUsize,
    commits: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty, non-persistent store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a non-persistent store from an existing snapshot.
    ///
    /// Fails if two documents share an id.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, AppError> {
        Ok(Self {
            state: RwLock::new(snapshot.normalized()?),
            ..Self::default()
        })
    }

    /// Opens the snapshot at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let snapshot: StoreSnapshot = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}, starting empty", path.display());
                StoreSnapshot::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            state: RwLock::new(snapshot.normalized()?),
            path: Some(path),
            ..Self::default()
        })
    }

    /// Returns the snapshot file path, if persistent.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a copy of the current committed state.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            queries: self.queries.load(Ordering::SeqCst),
            saves: self.saves.load(Ordering::SeqCst),
            commits: self.commits.load(Ordering::SeqCst),
        }
    }

    /// Persists `next`, then makes it the current state.
    ///
    /// The in-memory state is left untouched if the write fails.
    async fn replace(
        &self,
        state: &mut RwLockWriteGuard<'_, StoreSnapshot>,
        next: StoreSnapshot,
    ) -> Result<(), AppError> {
        self.persist(&next).await?;
        **state = next;
        Ok(())
    }

    async fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl ContentDefinitionStore for MemoryStore {
    async fn list_type_definitions(&self) -> Result<Vec<ContentTypeDefinition>, AppError> {
        Ok(self.state.read().await.type_definitions.clone())
    }

    async fn list_part_definitions(&self) -> Result<Vec<ContentPartDefinition>, AppError> {
        Ok(self.state.read().await.part_definitions.clone())
    }

    async fn get_type_definition(
        &self,
        name: &str,
    ) -> Result<Option<ContentTypeDefinition>, AppError> {
        let state = self.state.read().await;
        Ok(state.type_definitions.iter().find(|t| t.name == name).cloned())
    }

    async fn get_part_definition(
        &self,
        name: &str,
    ) -> Result<Option<ContentPartDefinition>, AppError> {
        let state = self.state.read().await;
        Ok(state.part_definitions.iter().find(|p| p.name == name).cloned())
    }

    async fn alter_part_definition(
        &self,
        name: &str,
        alteration: PartAlteration<'_>,
    ) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let position = state.part_definitions.iter().position(|p| p.name == name);
        let existing = position
            .map(|i| state.part_definitions[i].clone())
            .unwrap_or_else(|| ContentPartDefinition::new(name));

        let mut builder = ContentPartDefinitionBuilder::new(existing);
        alteration(&mut builder);
        let altered = builder.build();

        let mut next = state.clone();
        match position {
            Some(i) => next.part_definitions[i] = altered,
            None => next.part_definitions.push(altered),
        }

        self.replace(&mut state, next).await
    }

    async fn alter_type_definition(
        &self,
        name: &str,
        alteration: TypeAlteration<'_>,
    ) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let position = state.type_definitions.iter().position(|t| t.name == name);
        let existing = position
            .map(|i| state.type_definitions[i].clone())
            .unwrap_or_else(|| ContentTypeDefinition::new(name));

        let mut builder = ContentTypeDefinitionBuilder::new(existing);
        alteration(&mut builder);
        let altered = builder.build();

        let mut next = state.clone();
        match position {
            Some(i) => next.type_definitions[i] = altered,
            None => next.type_definitions.push(altered),
        }

        self.replace(&mut state, next).await
    }

    async fn delete_part_definition(&self, name: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if !state.part_definitions.iter().any(|p| p.name == name) {
            tracing::debug!("Part definition '{}' does not exist, nothing to delete", name);
            return Ok(());
        }

        let mut next = state.clone();
        next.part_definitions.retain(|p| p.name != name);
        for type_definition in &mut next.type_definitions {
            type_definition.parts.retain(|p| p.part_name != name);
        }

        self.replace(&mut state, next).await
    }
}

#[async_trait]
impl DocumentSession for MemoryStore {
    async fn query_documents(&self, filter: DocumentFilter) -> Result<Vec<ContentItem>, AppError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let state = self.state.read().await;
        let start = match filter.after {
            Some(after) => state.documents.partition_point(|d| d.document_id <= after),
            None => 0,
        };
        let limit = filter.limit.unwrap_or(usize::MAX);

        Ok(state.documents[start..]
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn save(&self, item: ContentItem) -> Result<(), AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut pending = self.pending.lock().await;

        // A later save of the same document replaces the earlier one
        if !item.is_new() {
            pending.retain(|p| p.is_new() || p.document_id != item.document_id);
        }
        pending.push(item);
        Ok(())
    }

    async fn commit(&self) -> Result<(), AppError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        let staged = std::mem::take(&mut *self.pending.lock().await);

        let mut state = self.state.write().await;
        if let Some(missing) = staged
            .iter()
            .find(|item| !item.is_new() && state.document_index(item.document_id).is_none())
        {
            return Err(AppError::DocumentNotFound(missing.document_id));
        }

        let count = staged.len();
        let mut next = state.clone();
        for mut item in staged {
            if item.is_new() {
                item.document_id = next.next_document_id();
                next.documents.push(item);
            } else if let Some(index) = next.document_index(item.document_id) {
                next.documents[index] = item;
            }
        }

        self.replace(&mut state, next).await?;
        tracing::debug!("Committed {} content item document(s)", count);
        Ok(())
    }

    async fn rollback(&self) -> Result<(), AppError> {
        let discarded = std::mem::take(&mut *self.pending.lock().await);
        if !discarded.is_empty() {
            tracing::debug!("Discarded {} staged content item document(s)", discarded.len());
        }
        Ok(())
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn get_record(&self, feature: &str) -> Result<Option<MigrationRecord>, AppError> {
        let state = self.state.read().await;
        Ok(state.migrations.iter().find(|m| m.feature == feature).cloned())
    }

    async fn list_records(&self) -> Result<Vec<MigrationRecord>, AppError> {
        Ok(self.state.read().await.migrations.clone())
    }

    async fn record_version(
        &self,
        feature: &str,
        version: u32,
        migration_id: &str,
    ) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        match next.migrations.iter_mut().find(|m| m.feature == feature) {
            Some(record) => record.advance(version, migration_id),
            None => next
                .migrations
                .push(MigrationRecord::new(feature, version, migration_id)),
        }

        self.replace(&mut state, next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionExt;
    use serde_json::json;

    async fn store_with_documents(count: usize) -> MemoryStore {
        let store = MemoryStore::new();
        for i in 0..count {
            store
                .save(ContentItem::new("Article", json!({ "index": i })))
                .await
                .unwrap();
        }
        store.commit().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_commit_assigns_increasing_ids() {
        let store = store_with_documents(3).await;
        let ids: Vec<_> = store
            .query()
            .list()
            .await
            .unwrap()
            .iter()
            .map(|d| d.document_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_query_after_and_take() {
        let store = store_with_documents(15).await;

        let batch = store.query().after(10).take(10).list().await.unwrap();
        let ids: Vec<_> = batch.iter().map(|d| d.document_id).collect();
        assert_eq!(ids, vec![11, 12, 13, 14, 15]);

        assert!(store.query().after(15).take(10).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_saves_invisible_until_commit() {
        let store = store_with_documents(1).await;
        let mut item = store.query().first().await.unwrap().unwrap();
        item.content = json!({ "changed": true });
        store.save(item).await.unwrap();

        let current = store.query().first().await.unwrap().unwrap();
        assert_eq!(current.content, json!({ "index": 0 }));

        store.commit().await.unwrap();
        let current = store.query().first().await.unwrap().unwrap();
        assert_eq!(current.content, json!({ "changed": true }));
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_saves() {
        let store = store_with_documents(1).await;
        let mut item = store.query().first().await.unwrap().unwrap();
        item.content = json!({ "changed": true });
        store.save(item).await.unwrap();
        store.rollback().await.unwrap();
        store.commit().await.unwrap();

        let current = store.query().first().await.unwrap().unwrap();
        assert_eq!(current.content, json!({ "index": 0 }));
    }

    #[tokio::test]
    async fn test_commit_unknown_document_fails() {
        let store = MemoryStore::new();
        let mut item = ContentItem::new("Article", json!({}));
        item.document_id = 42;
        store.save(item).await.unwrap();

        let err = store.commit().await.unwrap_err();
        assert!(matches!(err, AppError::DocumentNotFound(42)));
    }

    #[tokio::test]
    async fn test_alter_part_is_create_or_update() {
        let store = MemoryStore::new();
        store
            .alter_part_definition("HtmlBodyPart", &|p| {
                p.with_description("first");
            })
            .await
            .unwrap();
        store
            .alter_part_definition("HtmlBodyPart", &|p| {
                p.attachable().with_description("second");
            })
            .await
            .unwrap();

        let parts = store.list_part_definitions().await.unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].description, "second");
        assert!(parts[0].attachable);
    }

    #[tokio::test]
    async fn test_delete_part_detaches_from_types() {
        let store = MemoryStore::new();
        store
            .alter_part_definition("BodyPart", &|_| {})
            .await
            .unwrap();
        store
            .alter_type_definition("Article", &|t| {
                t.with_part("TitlePart").with_part("BodyPart");
            })
            .await
            .unwrap();

        store.delete_part_definition("BodyPart").await.unwrap();

        assert!(store.get_part_definition("BodyPart").await.unwrap().is_none());
        let article = store.get_type_definition("Article").await.unwrap().unwrap();
        assert!(!article.references_part("BodyPart"));
        assert!(article.references_part("TitlePart"));

        // Deleting again is a no-op
        store.delete_part_definition("BodyPart").await.unwrap();
    }

    #[tokio::test]
    async fn test_record_version_appends_history() {
        let store = MemoryStore::new();
        assert_eq!(store.get_version("html").await.unwrap(), None);

        store.record_version("html", 2, "create").await.unwrap();
        store.record_version("html", 3, "update_from_2").await.unwrap();

        let record = store.get_record("html").await.unwrap().unwrap();
        assert_eq!(record.version, 3);
        assert_eq!(record.applied_migrations, vec!["create", "update_from_2"]);
    }

    #[tokio::test]
    async fn test_snapshot_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = MemoryStore::open(&path).await.unwrap();
        store
            .save(ContentItem::new("Article", json!({ "BodyPart": { "Body": "x" } })))
            .await
            .unwrap();
        store.commit().await.unwrap();
        store.record_version("html", 2, "create").await.unwrap();

        let reopened = MemoryStore::open(&path).await.unwrap();
        assert_eq!(reopened.snapshot().await, store.snapshot().await);
        assert_eq!(reopened.get_version("html").await.unwrap(), Some(2));
    }

    fn document(document_id: u64, version_id: &str) -> ContentItem {
        let mut item = ContentItem::new("Article", json!({}));
        item.document_id = document_id;
        item.content_item_version_id = version_id.to_string();
        item
    }

    fn document_ids(snapshot: &StoreSnapshot) -> Vec<(u64, String)> {
        snapshot
            .documents
            .iter()
            .map(|d| (d.document_id, d.content_item_version_id.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_from_snapshot_sorts_documents() {
        let store = MemoryStore::from_snapshot(StoreSnapshot {
            documents: vec![document(3, "c"), document(1, "a"), document(2, "b")],
            ..StoreSnapshot::default()
        })
        .unwrap();

        let batch = store.query().after(1).take(1).list().await.unwrap();
        assert_eq!(batch[0].content_item_version_id, "b");

        let mut item = batch[0].clone();
        item.content = json!({ "changed": true });
        store.save(item).await.unwrap();
        store.commit().await.unwrap();

        assert_eq!(
            document_ids(&store.snapshot().await),
            vec![(1, "a".into()), (2, "b".into()), (3, "c".into())]
        );
    }

    #[tokio::test]
    async fn test_from_snapshot_assigns_missing_ids() {
        let store = MemoryStore::from_snapshot(StoreSnapshot {
            documents: vec![document(0, "x"), document(5, "a"), document(0, "y")],
            ..StoreSnapshot::default()
        })
        .unwrap();

        assert_eq!(
            document_ids(&store.snapshot().await),
            vec![(5, "a".into()), (6, "x".into()), (7, "y".into())]
        );
    }

    #[tokio::test]
    async fn test_from_snapshot_rejects_duplicate_ids() {
        let err = MemoryStore::from_snapshot(StoreSnapshot {
            documents: vec![document(2, "a"), document(1, "b"), document(2, "c")],
            ..StoreSnapshot::default()
        })
        .unwrap_err();

        assert!(matches!(err, AppError::Store { ref message } if message.contains("2")));
    }

    #[tokio::test]
    async fn test_open_normalizes_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let raw = json!({
            "documents": [
                { "DocumentId": 2, "ContentItemId": "i", "ContentItemVersionId": "b", "ContentType": "Article", "Content": {} },
                { "ContentItemId": "i", "ContentItemVersionId": "c", "ContentType": "Article", "Content": {} },
                { "DocumentId": 1, "ContentItemId": "i", "ContentItemVersionId": "a", "ContentType": "Article", "Content": {} }
            ]
        });
        std::fs::write(&path, raw.to_string()).unwrap();

        let store = MemoryStore::open(&path).await.unwrap();
        assert_eq!(
            document_ids(&store.snapshot().await),
            vec![(1, "a".into()), (2, "b".into()), (3, "c".into())]
        );

        let duplicated = json!({
            "documents": [
                { "DocumentId": 1, "ContentItemId": "i", "ContentItemVersionId": "a", "ContentType": "Article", "Content": {} },
                { "DocumentId": 1, "ContentItemId": "i", "ContentItemVersionId": "b", "ContentType": "Article", "Content": {} }
            ]
        });
        std::fs::write(&path, duplicated.to_string()).unwrap();
        assert!(MemoryStore::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("store.json");
        let store = MemoryStore::open(&path).await.unwrap();

        assert!(store
            .alter_part_definition("HtmlBodyPart", &|_| {})
            .await
            .is_err());
        assert!(store.record_version("html", 2, "create").await.is_err());
        store
            .save(ContentItem::new("Article", json!({})))
            .await
            .unwrap();
        assert!(store.commit().await.is_err());

        assert_eq!(store.snapshot().await, StoreSnapshot::default());

        std::fs::create_dir(dir.path().join("missing")).unwrap();
        store.record_version("html", 2, "create").await.unwrap();

        let reopened = MemoryStore::open(&path).await.unwrap();
        let snapshot = reopened.snapshot().await;
        assert!(snapshot.part_definitions.is_empty());
        assert!(snapshot.documents.is_empty());
        assert_eq!(reopened.get_version("html").await.unwrap(), Some(2));
    }
}
