// src/fs/mock.rs

use super::{EntryKind, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
    Symlink,
}

/// In-memory filesystem for tests.
///
/// Clones share state, so a test can keep a handle and mutate the tree while
/// a scanner holds another clone.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    denied: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            denied: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        self.ensure_dir_entry(&mut files, path);
    }

    pub fn add_symlink(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Symlink);
    }

    /// Remove an entry (and, for directories, everything below it).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        files.retain(|p, _| !p.starts_with(path));

        let parent = parent_or_root(path);
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (files.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
        {
            children.retain(|c| c != name);
        }
    }

    /// Make every access to `path` fail with a permission error.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.denied
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf());
    }

    fn check_access(&self, path: &Path) -> Result<()> {
        if self.denied.lock().unwrap().contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        Ok(())
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let path = path.to_path_buf();
        let mut files = self.files.lock().unwrap();
        files.insert(path.clone(), entry);

        // Ensure parent directories exist implicitly for simplicity in this mock
        let parent = parent_or_root(&path);
        self.ensure_dir_entry(&mut files, parent);
        link_child(&mut files, parent, &path);
    }

    fn ensure_dir_entry(&self, files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));

        let parent = parent_or_root(path);
        if parent != path {
            // Avoid infinite loop at root
            self.ensure_dir_entry(files, parent);
            link_child(files, parent, path);
        }
    }
}

fn parent_or_root(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
        if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.check_access(path)?;
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(_) => Err(anyhow!("Not a regular file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::Dir(_)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // In mock, we just return the path as is, assuming absolute paths are used in tests
        if !self.exists(path) {
            return Err(anyhow!("File not found: {:?}", path));
        }
        Ok(path.to_path_buf())
    }

    fn entry_kind(&self, path: &Path) -> Result<EntryKind> {
        self.check_access(path)?;
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File(_)) => Ok(EntryKind::File),
            Some(MockEntry::Dir(_)) => Ok(EntryKind::Dir),
            Some(MockEntry::Symlink) => Ok(EntryKind::Other),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.check_access(path)?;
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_file_creates_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("proj/src/main.rs", "fn main() {}");

        assert!(fs.is_dir(Path::new("proj")));
        assert!(fs.is_dir(Path::new("proj/src")));
        assert_eq!(
            fs.read_dir(Path::new("proj/src")).unwrap(),
            vec![PathBuf::from("proj/src/main.rs")]
        );
    }

    #[test]
    fn remove_unlinks_from_parent() {
        let fs = MockFileSystem::new();
        fs.add_file("proj/a.rs", "");
        fs.add_file("proj/b.rs", "");
        fs.remove("proj/a.rs");

        assert!(!fs.exists(Path::new("proj/a.rs")));
        assert_eq!(
            fs.read_dir(Path::new("proj")).unwrap(),
            vec![PathBuf::from("proj/b.rs")]
        );
    }

    #[test]
    fn denied_paths_fail() {
        let fs = MockFileSystem::new();
        fs.add_dir("proj/secret");
        fs.deny("proj/secret");

        assert!(fs.read_dir(Path::new("proj/secret")).is_err());
        assert!(fs.entry_kind(Path::new("proj/secret")).is_err());
    }
}
