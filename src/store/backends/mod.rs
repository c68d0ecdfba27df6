//! Backend implementations for content storage.
//!
//! Each backend implements the core traits from [`crate::store`]:
//!
//! - [`ContentDefinitionStore`](crate::store::ContentDefinitionStore) - Required
//! - [`DocumentSession`](crate::store::DocumentSession) - Required
//! - [`VersionStore`](crate::store::VersionStore) - Required
//!
//! # Available Backends
//!
//! | Backend | Module | Persistence |
//! |---------|--------|-------------|
//! | In-memory | [`memory`] | Optional JSON snapshot file |

pub mod memory;
