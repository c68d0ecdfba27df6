//! Initial step - defines the `HtmlBodyPart` part.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::context::Context;
use crate::error::AppError;
use crate::migrations::Migration;

use super::HTML_BODY_PART;

pub const HTML_BODY_PART_DESCRIPTION: &str = "Provides an HTML Body for your content item.";

/// Creates or updates the attachable `HtmlBodyPart` definition.
pub struct M001Create;

impl Migration for M001Create {
    fn id(&self) -> &'static str {
        "html001_create"
    }

    fn from_version(&self) -> Option<u32> {
        None
    }

    fn description(&self) -> &'static str {
        "Define the attachable HtmlBodyPart"
    }

    fn up<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<u32, AppError>> {
        async move {
            ctx.definitions
                .alter_part_definition(HTML_BODY_PART, &|part| {
                    part.attachable().with_description(HTML_BODY_PART_DESCRIPTION);
                })
                .await?;

            Ok(2)
        }
        .boxed()
    }
}
