use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to parse CSV: {message}")]
    Parse { message: String },

    #[error("CSV missing required columns. Required: {required:?}. Found: {found:?}")]
    Schema {
        required: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to render report: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(u64),

    #[error("Failed to access file: {path}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

impl ReportError {
    /// Short category name used in log fields and CLI output.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "Parse",
            Self::Schema { .. } => "Schema",
            Self::Render(_) => "Render",
            Self::Config(_) | Self::TomlParse(_) => "Config",
            Self::DatasetNotFound(_) | Self::FileAccess { .. } => "Store",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
        }
    }

    /// True when the caller supplied something unusable rather than the
    /// system failing.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::Schema { .. } | Self::DatasetNotFound(_)
        )
    }

    /// The message without the category prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Parse { message } => message.clone(),
            Self::Schema { required, found } => {
                let missing: Vec<&str> = required
                    .iter()
                    .filter(|column| !found.contains(column))
                    .map(String::as_str)
                    .collect();
                format!("missing {}", missing.join(", "))
            }
            Self::Render(msg) | Self::Config(msg) => msg.clone(),
            Self::DatasetNotFound(id) => id.to_string(),
            Self::FileAccess { path, .. } => path.display().to_string(),
            Self::Io(e) => e.to_string(),
            Self::TomlParse(e) => e.message().to_string(),
            Self::Json(e) => e.to_string(),
        }
    }

    /// Underlying cause, when there is one worth showing.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::FileAccess { source, .. } => Some(source.to_string()),
            Self::Schema { required, found } => Some(format!(
                "required: [{}]; found: [{}]",
                required.join(", "),
                found.join(", ")
            )),
            _ => None,
        }
    }

    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Parse { .. } => Some("Check that the file is comma-separated text with a header row"),
            Self::Schema { .. } => Some(
                "The header must contain Equipment Name, Type, Flowrate, Pressure and Temperature",
            ),
            Self::Config(_) => Some("Check the config file format and value ranges"),
            Self::TomlParse(_) => Some("Check the TOML syntax of the config file"),
            Self::DatasetNotFound(_) => Some("Run `equipment-report history` to list stored datasets"),
            Self::FileAccess { source, .. } | Self::Io(source) => match source.kind() {
                std::io::ErrorKind::NotFound => Some("Check that the file path exists"),
                std::io::ErrorKind::PermissionDenied => Some("Check file permissions"),
                _ => None,
            },
            Self::Render(_) | Self::Json(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
