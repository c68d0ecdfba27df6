//! Reserved version slot, no changes.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::context::Context;
use crate::error::AppError;
use crate::migrations::Migration;

/// Advances the html feature from 2 to 3 without touching storage.
pub struct M002Placeholder;

impl Migration for M002Placeholder {
    fn id(&self) -> &'static str {
        "html002_placeholder"
    }

    fn from_version(&self) -> Option<u32> {
        Some(2)
    }

    fn description(&self) -> &'static str {
        "Reserved version slot"
    }

    fn up<'a>(&'a self, _ctx: &'a Context) -> BoxFuture<'a, Result<u32, AppError>> {
        async move { Ok(3) }.boxed()
    }
}
