use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default SQLite database path when none is configured.
pub const DEFAULT_DB_PATH: &str = "almanac.db";

/// Top-level config (almanac.toml + ALMANAC_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlmanacConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Which storage backend to run against and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Connection target for the SQLite backend: a file path or `:memory:`.
    /// Ignored by the memory backend.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Extract(#[from] figment::Error),
}

impl AlmanacConfig {
    /// Load config from `path`, layering `ALMANAC_*` env vars on top.
    /// A missing file falls back to defaults; env overrides still apply.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ALMANAC_").split("_"))
            .extract()?;
        Ok(config)
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory_backend() {
        let config = AlmanacConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, DEFAULT_DB_PATH);
    }

    #[test]
    fn parses_toml_storage_section() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "almanac.toml",
                r#"
                [storage]
                backend = "sqlite"
                path = "/tmp/events.db"
                "#,
            )?;
            let config = AlmanacConfig::load("almanac.toml").expect("load");
            assert_eq!(config.storage.backend, StorageBackend::Sqlite);
            assert_eq!(config.storage.path, "/tmp/events.db");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_win() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ALMANAC_STORAGE_BACKEND", "sqlite");
            let config = AlmanacConfig::load("does-not-exist.toml").expect("load");
            assert_eq!(config.storage.backend, StorageBackend::Sqlite);
            Ok(())
        });
    }
}
