//! Domain models for content definitions, content items and migration state.

mod content_item;
mod definition;
mod migration;

pub use content_item::{generate_ulid, ContentItem};
pub use definition::{
    ContentPartDefinition, ContentPartDefinitionBuilder, ContentTypeDefinition,
    ContentTypeDefinitionBuilder, ContentTypePartDefinition,
};
pub use migration::MigrationRecord;
