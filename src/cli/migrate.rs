//! Migrate command handler.

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::migrations::{run_feature_migrations, run_migrations, FeatureMigrationResult};

use super::App;

impl App {
    /// Run pending migrations for one feature or all of them.
    pub async fn run_migrate(&self, feature: Option<&str>) -> Result<()> {
        let ctx = self.open_context().await?;

        tracing::info!("Running migrations...");
        let results = match feature {
            Some(feature) => vec![run_feature_migrations(&ctx, feature)
                .await
                .map_err(|e| eyre!("Migration failed: {}", e))?],
            None => {
                run_migrations(&ctx)
                    .await
                    .map_err(|e| eyre!("Migration failed: {}", e))?
                    .features
            }
        };

        for result in &results {
            report(result);
        }

        Ok(())
    }
}

fn report(result: &FeatureMigrationResult) {
    let version = format_version(result.current_version);

    if result.applied_migrations.is_empty() {
        tracing::info!(
            "Feature '{}' already at {}, no migrations needed",
            result.feature,
            version
        );
    } else {
        tracing::info!(
            "Feature '{}' migrated {} -> {}, applied: {:?}",
            result.feature,
            format_version(result.previous_version),
            version,
            result.applied_migrations
        );
    }
}

pub(super) fn format_version(version: Option<u32>) -> String {
    version.map_or_else(|| "unversioned".to_string(), |v| format!("v{}", v))
}
