#![allow(dead_code, unused_imports)]

pub use config_watcher_test_utils::*;

use std::fs;
use std::io;
use std::path::Path;

/// Replace a file's contents atomically (write elsewhere, then rename), so a
/// concurrent poll never sees a half-written file.
pub fn replace_file(path: &Path, contents: &str) -> io::Result<()> {
    let staging = tempfile::NamedTempFile::new_in(std::env::temp_dir())?;
    fs::write(staging.path(), contents)?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}
