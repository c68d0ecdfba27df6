//! Migration traits and registry.

use futures::future::BoxFuture;

use crate::context::Context;
use crate::error::AppError;

// =============================================================================
// Migration Trait
// =============================================================================

/// One upgrade step of a feature.
///
/// Steps are keyed by the version they upgrade from and return the version
/// the feature is at once they succeed. The initial step has no source
/// version and runs when the feature has never been migrated.
/// Uses BoxFuture to avoid `'static` requirements from `#[async_trait]`.
pub trait Migration: Send + Sync {
    fn id(&self) -> &'static str;

    /// Version this step upgrades from, `None` for the initial step.
    fn from_version(&self) -> Option<u32>;

    fn description(&self) -> &'static str;

    fn up<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<u32, AppError>>;
}

/// Outcome of running the pending steps of one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMigrationResult {
    pub feature: String,
    /// Version before any step ran, `None` for a never-migrated feature.
    pub previous_version: Option<u32>,
    pub current_version: Option<u32>,
    /// Ids of the steps applied during this run.
    pub applied_migrations: Vec<String>,
}

// =============================================================================
// Migration Registry
// =============================================================================

/// Ordered steps of one feature.
pub struct Register {
    feature: &'static str,
    migrations: Vec<Box<dyn Migration>>,
}

impl Register {
    pub fn new(feature: &'static str) -> Self {
        Self {
            feature,
            migrations: Vec::new(),
        }
    }

    pub fn register(mut self, migration: impl Migration + 'static) -> Self {
        self.migrations.push(Box::new(migration));
        self
    }

    pub fn feature(&self) -> &'static str {
        self.feature
    }

    /// Iterate over migrations.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.iter().map(|m| m.as_ref())
    }

    /// The step that upgrades from `version`.
    pub fn step_from(&self, version: Option<u32>) -> Option<&dyn Migration> {
        self.iter().find(|m| m.from_version() == version)
    }

    /// Run every step reachable from the feature's persisted version.
    ///
    /// The version is persisted after each successful step. On failure the
    /// session's staged saves are discarded and the version stays where the
    /// last successful step left it, so the next run retries the failed step.
    pub async fn run_pending(&self, ctx: &Context) -> Result<FeatureMigrationResult, AppError> {
        let previous_version = ctx.versions.get_version(self.feature).await?;
        let mut current_version = previous_version;
        let mut applied = vec![];

        while let Some(migration) = self.step_from(current_version) {
            tracing::info!(
                "Applying {} migration {} (from {}): {}",
                self.feature,
                migration.id(),
                current_version.map_or_else(|| "new".to_string(), |v| format!("v{}", v)),
                migration.description()
            );

            let next_version = match migration.up(ctx).await {
                Ok(version) => version,
                Err(e) => {
                    tracing::error!("Migration {} failed: {}", migration.id(), e);
                    if let Err(rollback) = ctx.session.rollback().await {
                        tracing::error!(
                            "Discarding staged saves after {} failed: {}",
                            migration.id(),
                            rollback
                        );
                    }
                    return Err(e);
                }
            };

            if let Some(current) = current_version {
                if next_version <= current {
                    return Err(AppError::VersionRegression {
                        migration: migration.id().to_string(),
                        current,
                        returned: next_version,
                    });
                }
            }

            ctx.versions
                .record_version(self.feature, next_version, migration.id())
                .await?;
            current_version = Some(next_version);
            applied.push(migration.id().to_string());
        }

        Ok(FeatureMigrationResult {
            feature: self.feature.to_string(),
            previous_version,
            current_version,
            applied_migrations: applied,
        })
    }
}
