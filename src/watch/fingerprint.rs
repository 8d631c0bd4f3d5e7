// src/watch/fingerprint.rs

//! Directory fingerprinting.
//!
//! Every regular file directly inside the watched directory is hashed on its
//! own blocking task. Results are merged once all tasks have joined, sorted
//! by path and folded into a single digest, so the fingerprint depends only
//! on the `(path, content)` pairs and never on enumeration order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::errors::{ConfigWatcherError, Result};
use crate::fs::{EntryKind, FileSystem};
use crate::metrics::MetricsSink;
use crate::types::{DirectorySnapshot, FileDigest, Fingerprint};
use crate::watch::hash::{compute_aggregate_hash, compute_file_hash};

/// Computes [`Fingerprint`]s for a directory.
///
/// Holds no state between computations apart from its collaborators.
pub struct FingerprintEngine {
    fs: Arc<dyn FileSystem>,
    metrics: Arc<dyn MetricsSink>,
}

impl std::fmt::Debug for FingerprintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintEngine")
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl FingerprintEngine {
    pub fn new(fs: Arc<dyn FileSystem>, metrics: Arc<dyn MetricsSink>) -> Self {
        Self { fs, metrics }
    }

    /// Compute the fingerprint of `dir`, never failing.
    ///
    /// An unreadable directory is logged and yields
    /// [`Fingerprint::unreadable`] so the next cycle can retry.
    pub async fn compute(&self, dir: &Path) -> Fingerprint {
        match self.snapshot(dir).await {
            Ok(snapshot) => snapshot.fingerprint,
            Err(err) => {
                error!(dir = ?dir, error = %err, "error reading watched dir");
                Fingerprint::unreadable()
            }
        }
    }

    /// Compute the fingerprint of `dir` together with the per-file digests
    /// that went into it.
    ///
    /// Fails only with [`ConfigWatcherError::DirectoryUnreadable`], also when
    /// the listing task itself dies; per-file errors exclude the file from
    /// this cycle.
    pub async fn snapshot(&self, dir: &Path) -> Result<DirectorySnapshot> {
        let entries = self.list(dir).await?;

        let mut set = JoinSet::new();
        for path in entries {
            let fs = Arc::clone(&self.fs);
            set.spawn_blocking(move || digest_entry(fs.as_ref(), path));
        }

        // Join barrier: nothing is emitted until every file task is done.
        let mut files = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Ok(Some(digest))) => files.push(digest),
                Ok(Ok(None)) => {}
                Ok(Err(err)) => {
                    error!(error = %err, "excluding file from this cycle");
                }
                Err(err) => {
                    error!(error = %err, "file hashing task failed");
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        let digests: Vec<&str> = files.iter().map(|f| f.digest.as_str()).collect();
        let fingerprint = Fingerprint::new(compute_aggregate_hash(&digests));

        debug!(
            dir = ?dir,
            files = files.len(),
            fingerprint = %fingerprint,
            "total hash calculated"
        );

        for file in &files {
            self.metrics.file_digest(
                &file.path.to_string_lossy(),
                &file.digest,
                fingerprint.as_str(),
            );
        }
        self.metrics.fingerprint_computed();

        Ok(DirectorySnapshot { fingerprint, files })
    }

    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let fs = Arc::clone(&self.fs);
        let owned = dir.to_path_buf();
        let listed = match tokio::task::spawn_blocking(move || fs.read_dir(&owned)).await {
            Ok(listed) => listed,
            Err(join_err) => Err(anyhow::Error::from(join_err)),
        };

        listed.map_err(|err| ConfigWatcherError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            reason: format!("{err:#}"),
        })
    }
}

/// Hash one directory entry. Anything but a regular file yields `None`.
fn digest_entry(fs: &dyn FileSystem, path: PathBuf) -> Result<Option<FileDigest>> {
    debug!(path = ?path, "checking");

    match fs.entry_kind(&path).map_err(|err| file_error(&path, err))? {
        EntryKind::File => {}
        EntryKind::Dir => {
            debug!(path = ?path, "skipping directory");
            return Ok(None);
        }
        EntryKind::Other => {
            debug!(path = ?path, "skipping non-regular file");
            return Ok(None);
        }
    }

    let digest = compute_file_hash(fs, &path).map_err(|err| file_error(&path, err))?;
    debug!(path = ?path, hash = %digest, "calculated hash");

    Ok(Some(FileDigest { path, digest }))
}

fn file_error(path: &Path, err: anyhow::Error) -> ConfigWatcherError {
    ConfigWatcherError::FileReadError {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::metrics::NoopMetrics;

    fn engine(fs: &MockFileSystem) -> FingerprintEngine {
        FingerprintEngine::new(Arc::new(fs.clone()), Arc::new(NoopMetrics))
    }

    #[tokio::test]
    async fn subdirectories_are_not_recursed() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/app/a.conf", "X");
        let before = engine(&fs).compute(Path::new("/etc/app")).await;

        fs.add_file("/etc/app/nested/b.conf", "Y");
        let snapshot = engine(&fs).snapshot(Path::new("/etc/app")).await.unwrap();

        assert_eq!(snapshot.fingerprint, before);
        assert_eq!(snapshot.files.len(), 1);
    }

    #[tokio::test]
    async fn files_are_sorted_by_path() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/app/c.conf", "3");
        fs.add_file("/etc/app/a.conf", "1");
        fs.add_file("/etc/app/b.conf", "2");

        let snapshot = engine(&fs).snapshot(Path::new("/etc/app")).await.unwrap();
        let names: Vec<_> = snapshot
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.conf", "b.conf", "c.conf"]);
    }

    #[tokio::test]
    async fn special_files_are_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/app/a.conf", "X");
        let before = engine(&fs).compute(Path::new("/etc/app")).await;

        fs.add_special("/etc/app/pipe");
        let snapshot = engine(&fs).snapshot(Path::new("/etc/app")).await.unwrap();

        assert_eq!(snapshot.fingerprint, before);
        assert_eq!(snapshot.files.len(), 1);
    }

    #[derive(Debug)]
    struct PanickingListing;

    impl FileSystem for PanickingListing {
        fn read_to_string(&self, _path: &Path) -> anyhow::Result<String> {
            unreachable!()
        }
        fn open_read(&self, _path: &Path) -> anyhow::Result<Box<dyn std::io::Read + Send>> {
            unreachable!()
        }
        fn entry_kind(&self, _path: &Path) -> anyhow::Result<EntryKind> {
            unreachable!()
        }
        fn read_dir(&self, _path: &Path) -> anyhow::Result<Vec<PathBuf>> {
            panic!("listing blew up")
        }
    }

    #[tokio::test]
    async fn failed_listing_task_is_reported_as_unreadable_dir() {
        let engine = FingerprintEngine::new(Arc::new(PanickingListing), Arc::new(NoopMetrics));

        let err = engine.snapshot(Path::new("/etc/app")).await.unwrap_err();
        assert!(matches!(err, ConfigWatcherError::DirectoryUnreadable { .. }));
    }

    #[tokio::test]
    async fn unreadable_dir_yields_sentinel() {
        let fs = MockFileSystem::new();
        let engine = engine(&fs);

        let err = engine.snapshot(Path::new("/missing")).await.unwrap_err();
        assert!(matches!(err, ConfigWatcherError::DirectoryUnreadable { .. }));
        assert!(engine.compute(Path::new("/missing")).await.is_unreadable());
    }
}
