use std::fmt;
use std::path::PathBuf;

/// Content digest of a single regular file inside the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub path: PathBuf,
    /// Lowercase hex digest (64 chars).
    pub digest: String,
}

/// Combined digest of every regular file directly inside a watched
/// directory.
///
/// The empty value is a sentinel meaning "the directory could not be listed"
/// and is only ever produced by [`Fingerprint::unreadable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn unreadable() -> Self {
        Self(String::new())
    }

    pub fn is_unreadable(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unreadable() {
            f.write_str("<unreadable>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Result of one full fingerprint computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub fingerprint: Fingerprint,
    /// Digests that went into `fingerprint`, sorted by path.
    pub files: Vec<FileDigest>,
}
