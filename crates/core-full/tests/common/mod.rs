// Shared helpers for core-full integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../core/tests/fixtures")
}

/// Temporary input directory holding copies of the named fixtures.
pub fn input_dir(fixtures: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in fixtures {
        copy_fixture(name, dir.path(), name);
    }
    dir
}

pub fn copy_fixture(name: &str, dir: &Path, as_name: &str) {
    std::fs::copy(fixtures_dir().join(name), dir.join(as_name)).expect("copy fixture");
}
