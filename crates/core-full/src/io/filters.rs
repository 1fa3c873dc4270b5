//! File filters for directory collection
use std::path::Path;

pub trait FileFilter: Send + Sync {
    fn should_include(&self, path: &Path) -> bool;
}

/// Accepts files whose extension is in the list (case-insensitive).
/// Office lock files (`~$name.xlsx`) are never included.
pub struct ExtensionFilter {
    extensions: &'static [&'static str],
}

impl ExtensionFilter {
    pub fn new(extensions: &'static [&'static str]) -> Self {
        Self { extensions }
    }
}

impl FileFilter for ExtensionFilter {
    fn should_include(&self, path: &Path) -> bool {
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$"));
        if is_lock_file {
            return false;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }
}
