mod filesystem;
mod loader;
mod model;

pub use filesystem::{FileSystem, RealFileSystem};
pub use loader::{ConfigLoader, FileConfigLoader, LOCAL_CONFIG_NAME, LoadResult};
pub use model::{Config, DEFAULT_CONFIG_TEMPLATE, StoreConfig};
