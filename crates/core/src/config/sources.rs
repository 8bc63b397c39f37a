use std::path::{Path, PathBuf};

/// Where a configuration unit was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File in the project's own `config/` directory
    Project(PathBuf),
    /// Packaged default shipped with the framework
    Package(PathBuf),
}

impl ConfigSource {
    /// Path of the configuration file
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Project(path) | ConfigSource::Package(path) => path,
        }
    }

    /// Check if source is the project override directory
    pub fn is_project(&self) -> bool {
        matches!(self, ConfigSource::Project(_))
    }

    /// Check if source is the packaged default directory
    pub fn is_package(&self) -> bool {
        matches!(self, ConfigSource::Package(_))
    }

    /// Get source description
    pub fn description(&self) -> String {
        match self {
            ConfigSource::Project(path) => format!("Project configuration: {}", path.display()),
            ConfigSource::Package(path) => format!("Package default: {}", path.display()),
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Outcome of a `configure` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoad {
    /// The unit was parsed and merged into the configuration store
    Loaded(ConfigSource),
    /// No file exists for the unit in either directory
    Missing,
    /// The unit was already handled earlier in this process
    AlreadyLoaded,
}

impl ConfigLoad {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ConfigLoad::Loaded(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigLoad::Missing)
    }

    pub fn source(&self) -> Option<&ConfigSource> {
        match self {
            ConfigLoad::Loaded(source) => Some(source),
            _ => None,
        }
    }
}
