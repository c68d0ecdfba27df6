//! Storage abstraction for content definitions, documents and migration versions.
//!
//! # Architecture
//!
//! Migrations only talk to storage through three traits:
//!
//! - [`ContentDefinitionStore`] - Part and type definitions (create-or-update alterations)
//! - [`DocumentSession`] - Content item documents with staged saves and per-batch commits
//! - [`VersionStore`] - Persisted schema version per feature
//!
//! # Usage
//!
//! ```ignore
//! use content_migrate::store::{DocumentSession, SessionExt};
//!
//! let batch = session.query().after(cursor).take(10).list().await?;
//! for mut item in batch {
//!     item.content["Touched"] = true.into();
//!     session.save(item).await?;
//! }
//! session.commit().await?;
//! ```

mod query;
mod traits;

pub mod backends;

pub use query::{DocumentQuery, SessionExt};
pub use traits::{
    ContentDefinitionStore, DocumentFilter, DocumentSession, PartAlteration, TypeAlteration,
    VersionStore,
};
