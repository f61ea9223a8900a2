use std::path::{Path, PathBuf};

use tracing::debug;

use super::filesystem::{FileSystem, RealFileSystem};
use super::model::Config;
use crate::error::{ReportError, Result};

pub const LOCAL_CONFIG_NAME: &str = ".equipment-report.toml";
const USER_CONFIG_NAME: &str = "config.toml";
/// Store directory used when neither the config nor the platform names one.
const FALLBACK_STORE_DIR: &str = ".equipment-report/store";

/// A loaded configuration and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub config: Config,
    /// `None` when no file was found and defaults are in effect.
    pub source: Option<PathBuf>,
}

pub trait ConfigLoader {
    /// Load from the first config file found, or defaults.
    ///
    /// # Errors
    /// Returns an error if a found file cannot be read, parsed or validated.
    fn load(&self) -> Result<LoadResult>;

    /// Load from an explicit path, which must exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    fn load_from_path(&self, path: &Path) -> Result<LoadResult>;

    /// Store directory for `config`: the configured path, else the platform
    /// data directory.
    fn store_dir(&self, config: &Config) -> PathBuf;
}

/// Loads configuration from the filesystem.
///
/// Search order:
/// 1. `.equipment-report.toml` in the current directory
/// 2. `config.toml` in the platform config directory
/// 3. `Config::default()`
#[derive(Debug)]
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub const fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    fn local_config_path(&self) -> Option<PathBuf> {
        self.fs.current_dir().ok().map(|dir| dir.join(LOCAL_CONFIG_NAME))
    }

    fn user_config_path(&self) -> Option<PathBuf> {
        self.fs.config_dir().map(|dir| dir.join(USER_CONFIG_NAME))
    }

    fn parse_config(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn read(&self, path: &Path) -> Result<LoadResult> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| ReportError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::parse_config(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(LoadResult {
            config,
            source: Some(path.to_path_buf()),
        })
    }
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self) -> Result<LoadResult> {
        let candidates = [self.local_config_path(), self.user_config_path()];
        for path in candidates.into_iter().flatten() {
            if self.fs.exists(&path) {
                return self.read(&path);
            }
        }
        debug!("no config file found, using defaults");
        Ok(LoadResult {
            config: Config::default(),
            source: None,
        })
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadResult> {
        self.read(path)
    }

    fn store_dir(&self, config: &Config) -> PathBuf {
        config
            .store
            .path
            .clone()
            .or_else(|| self.fs.data_dir().map(|dir| dir.join("store")))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_STORE_DIR))
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
