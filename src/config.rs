//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/content-migrate/config.toml` (XDG) or platform config dir
//! 2. Project config: `.content-migrate.toml`
//! 3. Environment variables: `CONTENT_MIGRATE_*`, nested keys separated by `__`
//!
//! # Example
//!
//! ```toml
//! [store]
//! path = "content-store.json"
//!
//! [migrations]
//! batch_size = 10
//! ```
//!
//! `CONTENT_MIGRATE_MIGRATIONS__BATCH_SIZE=50` overrides the batch size.

use std::ops::Deref;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Default number of content item documents fetched and committed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default snapshot file used by the JSON store.
pub const DEFAULT_STORE_PATH: &str = "content-store.json";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub migrations: MigrationsConfig,
}

/// Location of the persisted content store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot holding definitions, documents and migration versions.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Tuning for document rewrites.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationsConfig {
    /// Documents fetched and committed per transaction.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        let figment = Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(".content-migrate.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("CONTENT_MIGRATE_").split("__"));

        Self::from_figment(figment)
    }

    /// Extract and validate config from an already-layered figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        if config.migrations.batch_size == 0 {
            return Err(figment::Error::from("migrations.batch_size must be greater than 0").into());
        }
        Ok(config)
    }

    /// User config path: ~/.config/content-migrate/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("content-migrate")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("content-migrate").join("config.toml"))
            .unwrap_or_default()
    }
}
