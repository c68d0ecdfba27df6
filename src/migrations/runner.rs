//! Migration runner across all features.

use crate::context::Context;
use crate::error::AppError;
use crate::migrations::html;
use crate::migrations::traits::{FeatureMigrationResult, Register};

/// Result of running migrations.
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    pub features: Vec<FeatureMigrationResult>,
}

impl MigrationResult {
    /// Returns true if no feature had a pending step.
    pub fn is_up_to_date(&self) -> bool {
        self.features.iter().all(|f| f.applied_migrations.is_empty())
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureMigrationResult> {
        self.features.iter().find(|f| f.feature == name)
    }
}

/// All feature registers, in the order they run.
pub fn create_registers() -> Vec<Register> {
    vec![html::create_register()]
}

/// Run all pending migrations of every feature.
///
/// Features run one after another; the first failure stops the run.
pub async fn run_migrations(ctx: &Context) -> Result<MigrationResult, AppError> {
    let mut result = MigrationResult::default();

    for register in create_registers() {
        let feature = register.run_pending(ctx).await?;
        result.features.push(feature);
    }

    Ok(result)
}

/// Run the pending migrations of a single feature.
pub async fn run_feature_migrations(
    ctx: &Context,
    feature: &str,
) -> Result<FeatureMigrationResult, AppError> {
    let register = create_registers()
        .into_iter()
        .find(|r| r.feature() == feature)
        .ok_or_else(|| AppError::UnknownFeature(feature.to_string()))?;

    register.run_pending(ctx).await
}
