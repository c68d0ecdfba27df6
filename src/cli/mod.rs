//! CLI module for content-migrate.
//!
//! Subcommands:
//! - `migrate`: Run pending migrations against the configured store
//! - `status`: Show the recorded version of every feature
//! - `import`: Load definitions and content items from a seed file

mod import;
mod migrate;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::store::backends::memory::MemoryStore;

/// content-migrate - Versioned content schema and document migrations
#[derive(Parser)]
#[command(name = "content-migrate")]
#[command(about = "Versioned schema and document migrations for content storage")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store snapshot file, overrides `store.path` from configuration
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run all pending migrations
    Migrate {
        /// Only migrate this feature
        #[arg(long)]
        feature: Option<String>,
    },

    /// Show migration versions per feature
    Status,

    /// Import part definitions, type definitions and content items from a JSON file
    Import {
        /// Seed file to import
        file: PathBuf,
    },
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Migrate { ref feature } => self.run_migrate(feature.as_deref()).await,
            Command::Status => self.run_status().await,
            Command::Import { ref file } => self.run_import(file).await,
        }
    }

    /// Load configuration, applying command line overrides.
    fn load_config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        if let Some(path) = &self.store {
            config.store.path = path.clone();
        }
        Ok(config)
    }

    /// Open the configured store and build the migration context around it.
    async fn open_context(&self) -> Result<Context> {
        let config = self.load_config()?;
        tracing::info!("Opening content store at {}", config.store.path.display());

        let store = MemoryStore::open(&config.store.path)
            .await
            .map_err(|e| eyre!("Failed to open store: {}", e))?;

        Ok(Context::from_store(Arc::new(store), config))
    }
}
