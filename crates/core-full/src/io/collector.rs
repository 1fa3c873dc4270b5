use super::filters::FileFilter;
use sheetload_core::error::Result;
use std::path::{Path, PathBuf};

/// Collects the files of one directory that pass a filter.
pub struct FileCollector<F: FileFilter> {
    filter: F,
}

impl<F: FileFilter> FileCollector<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Matching files directly inside `dir`, sorted by path.
    /// Subdirectories are not descended into.
    pub fn collect(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.filter.should_include(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
