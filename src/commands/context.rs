use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::Cli;
use crate::config::{Config, ConfigLoader, FileConfigLoader};
use crate::error::Result;
use crate::report::Composer;
use crate::store::FsDatasetStore;

/// Author name used when neither `--generated-by` nor the environment
/// names one.
pub const DEFAULT_USER: &str = "user";

/// Everything a command needs from the global flags and the config file.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    /// Config file in effect, `None` for defaults.
    pub config_source: Option<PathBuf>,
    pub store_dir: PathBuf,
}

impl CommandContext {
    /// Resolve the context from the global CLI flags.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read, parsed or validated.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::load(
            &FileConfigLoader::new(),
            cli.config.as_deref(),
            cli.no_config,
            cli.store.clone(),
        )
    }

    /// Resolve the context through `loader`.
    ///
    /// `--no-config` wins over discovery; an explicit path must exist.
    /// A store override replaces whatever the config names.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read, parsed or validated.
    pub fn load<L: ConfigLoader>(
        loader: &L,
        config_path: Option<&Path>,
        no_config: bool,
        store_override: Option<PathBuf>,
    ) -> Result<Self> {
        let (config, config_source) = if no_config {
            (Config::default(), None)
        } else {
            let loaded = match config_path {
                Some(path) => loader.load_from_path(path)?,
                None => loader.load()?,
            };
            (loaded.config, loaded.source)
        };
        let store_dir = store_override.unwrap_or_else(|| loader.store_dir(&config));
        debug!(
            config = ?config_source,
            store = %store_dir.display(),
            "resolved command context"
        );
        Ok(Self {
            config,
            config_source,
            store_dir,
        })
    }

    /// Context with default config and the given store, for callers that
    /// bypass config discovery.
    #[must_use]
    pub fn with_store(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::default(),
            config_source: None,
            store_dir: store_dir.into(),
        }
    }

    #[must_use]
    pub fn store(&self) -> FsDatasetStore {
        FsDatasetStore::new(&self.store_dir).with_retention(self.config.store.retention)
    }

    #[must_use]
    pub fn composer(&self) -> Composer {
        Composer::new(self.config.report.clone())
    }
}

/// Report author: the explicit name, else the login name from the
/// environment, else [`DEFAULT_USER`].
#[must_use]
pub fn generated_by(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string())
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
