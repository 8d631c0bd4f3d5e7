// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// What a directory entry resolves to once symlinks are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Pipes, sockets, devices. Opening one may block, so it is never read.
    Other,
}

/// Abstract filesystem interface used by the config loader and the
/// fingerprint engine.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// Errors when the path cannot be stat'ed (e.g. it vanished).
    fn entry_kind(&self, path: &Path) -> Result<EntryKind>;

    /// Return the direct entries of a directory as full paths, in whatever
    /// order the underlying filesystem yields them.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        Ok(Box::new(file))
    }

    fn entry_kind(&self, path: &Path) -> Result<EntryKind> {
        // Follows symlinks, so a link to a regular file is hashed like one.
        let meta = fs::metadata(path).with_context(|| format!("reading file stats {:?}", path))?;
        let kind = if meta.is_file() {
            EntryKind::File
        } else if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::Other
        };
        Ok(kind)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry.with_context(|| format!("reading entry of dir {:?}", path))?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}
