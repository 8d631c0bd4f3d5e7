// src/watch/hash.rs

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;

use crate::fs::FileSystem;

/// Compute the hex digest of a single file by streaming its contents.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading file for hashing: {:?}", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Compute the aggregate digest from per-file digests.
///
/// `hashes` must already be ordered by the corresponding file path.
pub fn compute_aggregate_hash<S: AsRef<str>>(hashes: &[S]) -> String {
    let mut hasher = Hasher::new();
    for h in hashes {
        hasher.update(h.as_ref().as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn file_hash_matches_blake3_of_contents() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", b"hello world".to_vec());

        let hash = compute_file_hash(&fs, Path::new("test.txt")).unwrap();
        assert_eq!(hash, blake3::hash(b"hello world").to_hex().to_string());
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn aggregate_is_hash_of_concatenation() {
        let a = "aa".repeat(32);
        let b = "bb".repeat(32);
        let expected = blake3::hash(format!("{a}{b}").as_bytes()).to_hex().to_string();

        assert_eq!(compute_aggregate_hash(&[a.as_str(), b.as_str()]), expected);
    }

    #[test]
    fn aggregate_of_nothing_is_hash_of_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(
            compute_aggregate_hash(&empty),
            blake3::hash(b"").to_hex().to_string()
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let fs = MockFileSystem::new();
        assert!(compute_file_hash(&fs, Path::new("nope.txt")).is_err());
    }
}
