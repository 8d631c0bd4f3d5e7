// src/fs/mock.rs

use super::{EntryKind, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // child names, in insertion order
    Special,          // fifo, socket or device
}

/// In-memory filesystem for tests.
///
/// `read_dir` yields children in insertion order, which lets tests build
/// the same directory with different enumeration orders.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        // A poisoned lock only means another test thread panicked.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add or overwrite a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.lock();
        files.insert(path.clone(), MockEntry::File(content.into()));
        Self::link_into_parent(&mut files, &path);
    }

    /// Add an entry that is neither a file nor a directory, such as a fifo.
    pub fn add_special(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.lock();
        files.insert(path.clone(), MockEntry::Special);
        Self::link_into_parent(&mut files, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.lock();
        Self::ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Drop a file's contents while keeping it listed in its parent, which is
    /// what a reader sees when a file is deleted between listing and hashing.
    pub fn vanish(&self, path: impl AsRef<Path>) {
        let mut files = self.lock();
        files.remove(path.as_ref());
    }

    /// Remove an entry and unlink it from its parent.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.lock();
        files.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let parent = normalize_parent(parent);
            if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
                children.retain(|c| c.as_str() != name.to_string_lossy());
            }
        }
    }

    fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        let parent = normalize_parent(parent);
        if parent == path {
            return;
        }

        Self::ensure_dir_entry(files, parent);
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        Self::link_into_parent(files, path);
    }
}

fn normalize_parent(parent: &Path) -> &Path {
    if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.lock();
        match files.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            Some(MockEntry::Special) => Err(anyhow!("Not a regular file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let files = self.lock();
        match files.get(path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            Some(MockEntry::Special) => Err(anyhow!("Not a regular file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn entry_kind(&self, path: &Path) -> Result<EntryKind> {
        let files = self.lock();
        match files.get(path) {
            Some(MockEntry::Dir(_)) => Ok(EntryKind::Dir),
            Some(MockEntry::File(_)) => Ok(EntryKind::File),
            Some(MockEntry::Special) => Ok(EntryKind::Other),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.lock();
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
    fn read_dir_keeps_insertion_order() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/b.conf", "Y");
        fs.add_file("/etc/a.conf", "X");

        let entries = fs.read_dir(Path::new("/etc")).unwrap();
        assert_eq!(
            entries,
            vec![PathBuf::from("/etc/b.conf"), PathBuf::from("/etc/a.conf")]
        );
    }

    #[test]
    fn vanished_file_stays_listed_but_cannot_be_opened() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/a.conf", "X");
        fs.vanish("/etc/a.conf");

        assert_eq!(fs.read_dir(Path::new("/etc")).unwrap().len(), 1);
        assert!(fs.open_read(Path::new("/etc/a.conf")).is_err());
        assert!(fs.entry_kind(Path::new("/etc/a.conf")).is_err());
    }

    #[test]
    fn special_entries_are_listed_but_not_readable() {
        let fs = MockFileSystem::new();
        fs.add_special("/etc/pipe");

        assert_eq!(fs.read_dir(Path::new("/etc")).unwrap().len(), 1);
        assert_eq!(fs.entry_kind(Path::new("/etc/pipe")).unwrap(), EntryKind::Other);
        assert!(fs.open_read(Path::new("/etc/pipe")).is_err());
    }

    #[test]
    fn remove_unlinks_from_parent() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/a.conf", "X");
        fs.remove("/etc/a.conf");

        assert!(fs.read_dir(Path::new("/etc")).unwrap().is_empty());
    }
}
