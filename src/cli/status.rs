//! Status command handler.

use color_eyre::Result;

use crate::migrations::create_registers;

use super::migrate::format_version;
use super::App;

impl App {
    /// Print the recorded version and pending steps of every feature.
    pub async fn run_status(&self) -> Result<()> {
        let ctx = self.open_context().await?;

        for register in create_registers() {
            let record = ctx.versions.get_record(register.feature()).await?;
            let version = record.as_ref().map(|r| r.version);

            let pending: Vec<_> = register
                .iter()
                .filter(|step| match (version, step.from_version()) {
                    (None, _) => true,
                    (Some(current), Some(from)) => from >= current,
                    (Some(_), None) => false,
                })
                .map(|step| step.id())
                .collect();

            println!("{}: {}", register.feature(), format_version(version));
            if let Some(record) = &record {
                println!("  last applied: {}", record.last_applied_at.to_rfc3339());
                println!("  applied: {}", record.applied_migrations.join(", "));
            }
            if pending.is_empty() {
                println!("  up to date");
            } else {
                println!("  pending: {}", pending.join(", "));
            }
        }

        Ok(())
    }
}
