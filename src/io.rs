//! IO Abstraction (C1): the single seam through which the pipeline touches a
//! filesystem. Grounded on `IoDelegate` in the upstream AIDL compiler, which
//! exposes exactly `GetFileContents`/`FileIsReadable` so tests can substitute
//! an in-memory filesystem instead of touching disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read access to a filesystem (real or simulated). The pipeline reads each
/// file at most once and performs no caching itself; an implementation is
/// free to cache if it wants to, but none of the ones here do.
pub trait IoDelegate {
    /// Read the full contents of `path` as a UTF-8 string.
    ///
    /// # Errors
    /// Returns an error message suitable for an `IO` diagnostic if the file
    /// does not exist, isn't readable, or isn't valid UTF-8.
    fn get_file_contents(&self, path: &Path) -> Result<String, String>;

    /// Whether `path` exists and can be read.
    fn file_is_readable(&self, path: &Path) -> bool;
}

/// Reads from the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsIo;

impl IoDelegate for FsIo {
    fn get_file_contents(&self, path: &Path) -> Result<String, String> {
        fs::read_to_string(path).map_err(|e| e.to_string())
    }

    fn file_is_readable(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }
}

/// An in-memory filesystem for tests: a fixed map from path to contents, with
/// no disk access at all.
#[derive(Debug, Default, Clone)]
pub struct MemIo {
    files: HashMap<PathBuf, String>,
}

impl MemIo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's contents, overwriting any prior entry at the same
    /// path.
    pub fn add(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl IoDelegate for MemIo {
    fn get_file_contents(&self, path: &Path) -> Result<String, String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| "no such file".to_string())
    }

    fn file_is_readable(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}
