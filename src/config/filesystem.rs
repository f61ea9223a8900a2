//! Filesystem access behind a trait so config discovery can be tested
//! without touching the real disk.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const APP_NAME: &str = "equipment-report";

pub trait FileSystem {
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// # Errors
    /// Returns an error if the current directory cannot be determined.
    fn current_dir(&self) -> std::io::Result<PathBuf>;

    /// Platform config directory for equipment-report:
    /// - Linux: `~/.config/equipment-report`
    /// - macOS: `~/Library/Application Support/equipment-report`
    /// - Windows: `%APPDATA%\equipment-report\config`
    fn config_dir(&self) -> Option<PathBuf>;

    /// Platform data directory, home of the default dataset store.
    fn data_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn data_dir(&self) -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().to_path_buf())
    }
}
