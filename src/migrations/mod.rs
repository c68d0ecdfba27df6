//! Feature migrations with per-feature version tracking.
//!
//! Migrations are:
//! - **Keyed by source version**: each step declares the version it upgrades from
//!   and returns the version it leaves the feature at
//! - **Resumable**: the version is persisted after every successful step, a failed
//!   step is retried on the next run
//! - **Idempotent**: definition changes use create-or-update alterations and document
//!   rewrites only add data, so retrying a half-applied step is safe
//! - **Forward-only**: no rollback support

pub mod html;
mod runner;
mod traits;

pub use runner::{create_registers, run_feature_migrations, run_migrations, MigrationResult};
pub use traits::{FeatureMigrationResult, Migration, Register};
