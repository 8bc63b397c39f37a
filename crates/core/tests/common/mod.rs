#![allow(dead_code)]

use mine_core::Application;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A project directory and a package directory, both empty
pub struct Sandbox {
    pub project: TempDir,
    pub package: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            project: TempDir::new().unwrap(),
            package: TempDir::new().unwrap(),
        }
    }

    pub fn app(&self) -> Application {
        Application::new(self.project.path()).with_package_path(self.package.path())
    }

    pub fn project_config(&self, file: &str, contents: &str) {
        write(&self.project.path().join("config"), file, contents);
    }

    pub fn package_config(&self, file: &str, contents: &str) {
        write(&self.package.path().join("config"), file, contents);
    }
}

fn write(dir: &Path, file: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
}
