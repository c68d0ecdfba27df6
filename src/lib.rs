//! content-migrate - Versioned content schema and document migrations
//!
//! Evolves content part and type definitions and rewrites stored content item
//! documents in committed batches, tracking a schema version per feature.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod json;
pub mod migrations;
pub mod models;
pub mod store;
