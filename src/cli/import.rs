//! Import command handler.

use std::path::Path;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::Deserialize;

use crate::context::Context;
use crate::error::AppError;
use crate::models::{ContentItem, ContentPartDefinition, ContentTypeDefinition};

use super::App;

/// Seed file layout.
///
/// ```json
/// {
///   "part_definitions": [{ "name": "BodyPart", "attachable": true }],
///   "type_definitions": [{ "name": "Article", "parts": [{ "name": "BodyPart", "part_name": "BodyPart" }] }],
///   "content_items": [{ "ContentItemId": "...", "ContentItemVersionId": "...", "ContentType": "Article", "Content": {} }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub part_definitions: Vec<ContentPartDefinition>,
    #[serde(default)]
    pub type_definitions: Vec<ContentTypeDefinition>,
    #[serde(default)]
    pub content_items: Vec<ContentItem>,
}

impl App {
    /// Import a seed file into the configured store.
    pub async fn run_import(&self, file: &Path) -> Result<()> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| eyre!("Failed to read {}: {}", file.display(), e))?;
        let seed: SeedFile = serde_json::from_slice(&bytes)
            .map_err(|e| eyre!("Invalid seed file {}: {}", file.display(), e))?;

        let ctx = self.open_context().await?;
        import_seed(&ctx, seed)
            .await
            .map_err(|e| eyre!("Import failed: {}", e))?;

        Ok(())
    }
}

/// Writes `seed` through the context's stores.
///
/// Definitions are altered (created or updated); content items are always
/// inserted as new documents in file order and committed together.
pub async fn import_seed(ctx: &Context, seed: SeedFile) -> Result<(), AppError> {
    for part in &seed.part_definitions {
        ctx.definitions
            .alter_part_definition(&part.name, &|p| {
                p.with_description(part.description.as_str());
                if part.attachable {
                    p.attachable();
                } else {
                    p.not_attachable();
                }
            })
            .await?;
    }

    for type_definition in &seed.type_definitions {
        ctx.definitions
            .alter_type_definition(&type_definition.name, &|t| {
                if !type_definition.display_name.is_empty() {
                    t.display_name(type_definition.display_name.as_str());
                }
                for part in &type_definition.parts {
                    t.with_named_part(&part.name, &part.part_name);
                }
            })
            .await?;
    }

    let count = seed.content_items.len();
    for mut item in seed.content_items {
        item.document_id = 0;
        ctx.session.save(item).await?;
    }
    ctx.session.commit().await?;

    tracing::info!(
        "Imported {} part definition(s), {} type definition(s), {} content item(s)",
        seed.part_definitions.len(),
        seed.type_definitions.len(),
        count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::Config;
    use crate::store::backends::memory::MemoryStore;
    use crate::store::{ContentDefinitionStore, SessionExt};

    #[tokio::test]
    async fn test_import_seed() {
        let seed: SeedFile = serde_json::from_value(json!({
            "part_definitions": [{ "name": "BodyPart", "description": "Legacy body", "attachable": true }],
            "type_definitions": [{
                "name": "Article",
                "display_name": "Article",
                "parts": [
                    { "name": "TitlePart", "part_name": "TitlePart" },
                    { "name": "BodyPart", "part_name": "BodyPart" }
                ]
            }],
            "content_items": [
                { "DocumentId": 99, "ContentItemId": "a", "ContentItemVersionId": "a1", "ContentType": "Article", "Content": {} },
                { "ContentItemId": "b", "ContentItemVersionId": "b1", "ContentType": "Article", "Content": {} }
            ]
        }))
        .unwrap();

        let store = Arc::new(MemoryStore::new());
        let ctx = Context::from_store(store.clone(), Config::default());
        import_seed(&ctx, seed).await.unwrap();

        let body = store.get_part_definition("BodyPart").await.unwrap().unwrap();
        assert!(body.attachable);
        assert_eq!(body.description, "Legacy body");

        let article = store.get_type_definition("Article").await.unwrap().unwrap();
        assert_eq!(article.parts.len(), 2);

        let ids: Vec<_> = store
            .query()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| (d.document_id, d.content_item_version_id))
            .collect();
        assert_eq!(ids, vec![(1, "a1".to_string()), (2, "b1".to_string())]);
    }
}
