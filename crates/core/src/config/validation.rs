use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported configuration format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Configuration file {} must contain a mapping at the top level", .path.display())]
    InvalidStructure { path: PathBuf },

    #[error("Invalid value for configuration key '{key}': {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Check if the error comes from malformed configuration contents
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Yaml { .. } | Self::Json { .. } | Self::InvalidStructure { .. }
        )
    }

    /// The file the error refers to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. }
            | Self::Yaml { path, .. }
            | Self::Json { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::InvalidStructure { path } => Some(path),
            Self::InvalidValue { .. } => None,
        }
    }
}
