//! BodyPart retirement - moves types and stored documents to `HtmlBodyPart`.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value as JsonValue};

use crate::context::Context;
use crate::error::AppError;
use crate::json::{nested_str, visit_objects_mut};
use crate::migrations::Migration;
use crate::store::SessionExt;

use super::{BODY_PART, HTML_BODY_PART};

/// Replaces `BodyPart` with `HtmlBodyPart` on every type definition, deletes
/// the `BodyPart` definition, then rewrites every content item version.
pub struct M003BodyPart;

impl M003BodyPart {
    async fn migrate_type_definitions(&self, ctx: &Context) -> Result<(), AppError> {
        for type_definition in ctx.definitions.list_type_definitions().await? {
            let legacy: Vec<String> = type_definition
                .parts
                .iter()
                .filter(|p| p.part_name == BODY_PART)
                .map(|p| p.name.clone())
                .collect();

            if legacy.is_empty() {
                continue;
            }

            ctx.definitions
                .alter_type_definition(&type_definition.name, &|t| {
                    for name in &legacy {
                        t.remove_part(name);
                    }
                    t.with_part(HTML_BODY_PART);
                })
                .await?;

            tracing::info!(
                "Content type '{}' now uses {} instead of {}",
                type_definition.name,
                HTML_BODY_PART,
                BODY_PART
            );
        }

        ctx.definitions.delete_part_definition(BODY_PART).await?;
        Ok(())
    }

    /// Walks all documents in ascending id order, one committed batch at a time.
    async fn migrate_documents(&self, ctx: &Context) -> Result<(), AppError> {
        let batch_size = ctx.batch_size();
        let mut last_document_id = 0;

        loop {
            let batch = ctx
                .session
                .query()
                .after(last_document_id)
                .take(batch_size)
                .list()
                .await?;

            if batch.is_empty() {
                break;
            }

            for mut item in batch {
                let document_id = item.document_id;

                if upgrade_body(&mut item.content) {
                    tracing::info!(
                        content_item_version_id = %item.content_item_version_id,
                        document_id,
                        "A content item version's BodyPart was upgraded: '{}'",
                        item.content_item_version_id
                    );
                    ctx.session.save(item).await?;
                }

                last_document_id = document_id;
            }

            ctx.session.commit().await?;
            tracing::debug!("Committed batch ending at document {}", last_document_id);
        }

        Ok(())
    }
}

impl Migration for M003BodyPart {
    fn id(&self) -> &'static str {
        "html003_body_part"
    }

    fn from_version(&self) -> Option<u32> {
        Some(3)
    }

    fn description(&self) -> &'static str {
        "Replace BodyPart with HtmlBodyPart on types and content items"
    }

    fn up<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<u32, AppError>> {
        async move {
            self.migrate_type_definitions(ctx).await?;
            self.migrate_documents(ctx).await?;
            Ok(4)
        }
        .boxed()
    }
}

/// Copies every non-blank `BodyPart.Body` in `content` into a sibling
/// `HtmlBodyPart.Html`. `BodyPart` itself is kept.
///
/// Returns true if anything was written.
pub fn upgrade_body(content: &mut JsonValue) -> bool {
    visit_objects_mut(content, &mut |object| {
        let Some(body) = nested_str(object, BODY_PART, "Body") else {
            return false;
        };
        if body.trim().is_empty() {
            return false;
        }

        let html = json!({ "Html": body });
        object.insert(HTML_BODY_PART.to_string(), html);
        true
    })
}
