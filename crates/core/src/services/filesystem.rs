use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Thin filesystem service bound under `files`
#[derive(Debug, Clone, Copy, Default)]
pub struct Filesystem;

impl Filesystem {
    pub fn new() -> Self {
        Filesystem
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().exists()
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_dir()
    }

    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Read a file as UTF-8 text
    pub fn get(&self, path: impl AsRef<Path>) -> io::Result<String> {
        fs::read_to_string(path)
    }

    /// Write a file, creating missing parent directories
    pub fn put(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }

    /// Delete a file; returns false if it did not exist
    pub fn delete(&self, path: impl AsRef<Path>) -> io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Regular files directly inside `dir`, sorted
    pub fn files(&self, dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_get_delete() {
        let dir = TempDir::new().unwrap();
        let files = Filesystem::new();
        let path = dir.path().join("nested/notes.txt");

        files.put(&path, "hello").unwrap();
        assert!(files.is_file(&path));
        assert!(files.is_dir(dir.path().join("nested")));
        assert_eq!(files.get(&path).unwrap(), "hello");

        assert!(files.delete(&path).unwrap());
        assert!(!files.delete(&path).unwrap());
        assert!(!files.exists(&path));
    }

    #[test]
    fn test_files_lists_sorted_regular_files() {
        let dir = TempDir::new().unwrap();
        let files = Filesystem::new();
        files.put(dir.path().join("b.yaml"), "").unwrap();
        files.put(dir.path().join("a.yaml"), "").unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();

        let listed = files.files(dir.path()).unwrap();
        assert_eq!(listed, vec![dir.path().join("a.yaml"), dir.path().join("b.yaml")]);
    }
}
