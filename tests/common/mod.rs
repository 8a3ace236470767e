//! Shared helpers for integration tests.

#![allow(dead_code)]

use dircast::catalog::{Catalog, CatalogBuilder, Share};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://127.0.0.1:5279";

/// Create a file with the given contents, creating parent directories.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A share directory with a small media tree:
///
/// ```text
/// media/
///   a.avi          (100 bytes)
///   b.mkv          (7 bytes)
///   skip.txt       (not media)
///   Series/
///     ep1.avi      (5 bytes)
/// ```
pub fn media_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.avi", &[0u8; 100]);
    write_file(dir.path(), "b.mkv", b"matroni");
    write_file(dir.path(), "skip.txt", b"notes");
    write_file(dir.path(), "Series/ep1.avi", b"hello");
    dir
}

/// Build a catalog over a single named share.
pub fn build_catalog(name: &str, dir: &TempDir) -> Catalog {
    CatalogBuilder::new(BASE_URL).build(&[Share {
        name: name.to_string(),
        path: dir.path().to_path_buf(),
    }])
}
