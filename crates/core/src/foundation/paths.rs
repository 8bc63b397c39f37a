use std::path::{Path, PathBuf};

/// Directory shipped with this crate that holds packaged defaults
pub fn default_package_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Filesystem locations derived from the application's base path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    base: PathBuf,
    package: PathBuf,
}

impl Paths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            package: default_package_path(),
        }
    }

    /// Use the current working directory as the base path
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Override the packaged default directory
    pub fn with_package(mut self, package: impl Into<PathBuf>) -> Self {
        self.package = package.into();
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Base path, optionally joined with a relative path
    pub fn base_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            self.base.clone()
        } else {
            self.base.join(path)
        }
    }

    pub fn app_path(&self) -> PathBuf {
        self.base.join("app")
    }

    pub fn api_path(&self) -> PathBuf {
        self.app_path().join("api")
    }

    /// Project configuration override directory
    pub fn config_path(&self) -> PathBuf {
        self.base.join("config")
    }

    pub fn package_path(&self) -> &Path {
        &self.package
    }

    pub fn package_config_path(&self) -> PathBuf {
        self.package.join("config")
    }

    /// Language files: the project's `resources/lang` if it exists, else the package's
    pub fn language_path(&self) -> PathBuf {
        let project = self.base.join("resources").join("lang");
        if project.is_dir() {
            project
        } else {
            self.package.join("resources").join("lang")
        }
    }
}
