use crate::config::{ConfigError, ConfigSource};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions tried for a configuration unit, in order
pub const CONFIG_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Locates and parses configuration units, remembering which ran.
///
/// A unit is looked up in the project directory first and then in the
/// packaged default directory. Marking happens before the file is read,
/// so a nested `configure` of the same unit during loading is a no-op.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    project_dir: PathBuf,
    package_dir: PathBuf,
    loaded: HashSet<String>,
    sources: HashMap<String, ConfigSource>,
}

impl ConfigLoader {
    pub fn new(project_dir: impl Into<PathBuf>, package_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            package_dir: package_dir.into(),
            loaded: HashSet::new(),
            sources: HashMap::new(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// Check if a unit has already been handled
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    /// Mark a unit as loaded; returns false if it already was
    pub fn begin(&mut self, name: &str) -> bool {
        self.loaded.insert(name.to_string())
    }

    /// Remember where a loaded unit came from
    pub fn record(&mut self, name: &str, source: ConfigSource) {
        self.sources.insert(name.to_string(), source);
    }

    /// Source of a loaded unit, if it was found on disk
    pub fn source(&self, name: &str) -> Option<&ConfigSource> {
        self.sources.get(name)
    }

    /// Every handled unit with its source (`None` when it was missing), sorted by name
    pub fn loaded(&self) -> Vec<(&str, Option<&ConfigSource>)> {
        let mut loaded: Vec<(&str, Option<&ConfigSource>)> = self
            .loaded
            .iter()
            .map(|name| (name.as_str(), self.sources.get(name)))
            .collect();
        loaded.sort_unstable_by(|a, b| a.0.cmp(b.0));
        loaded
    }

    /// The configuration directory in use: project if present, else package
    pub fn directory(&self) -> Option<PathBuf> {
        [&self.project_dir, &self.package_dir]
            .into_iter()
            .find(|dir| dir.is_dir())
            .cloned()
    }

    /// Find the file for a unit, preferring the project directory
    pub fn locate(&self, name: &str) -> Option<ConfigSource> {
        if let Some(path) = Self::find_in(&self.project_dir, name) {
            return Some(ConfigSource::Project(path));
        }

        Self::find_in(&self.package_dir, name).map(ConfigSource::Package)
    }

    fn find_in(dir: &Path, name: &str) -> Option<PathBuf> {
        CONFIG_EXTENSIONS
            .iter()
            .map(|extension| dir.join(format!("{name}.{extension}")))
            .find(|path| path.is_file())
    }

    /// Read and parse a configuration file into a mapping.
    ///
    /// An empty document is treated as an empty mapping.
    pub fn parse(path: &Path) -> Result<Value, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();

        let value: Value = match extension {
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            "json" => serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        match value {
            Value::Object(_) => Ok(value),
            Value::Null => Ok(Value::Object(Map::new())),
            _ => Err(ConfigError::InvalidStructure {
                path: path.to_path_buf(),
            }),
        }
    }
}
