//! Unit name → source directory mapping.
//!
//! The table is applied in order as literal substring replacements; the
//! remaining dots then become path separators. Order matters: an earlier,
//! longer pattern must come before a shorter one it contains.

use std::path::{Path, PathBuf};

use crate::config::PathMappingEntry;

/// Ordered `(pattern, replacement)` table.
#[derive(Debug, Clone, Default)]
pub struct PathMapping {
    entries: Vec<(String, String)>,
}

impl PathMapping {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Apply the replacements and convert dots to path components.
    pub fn relative_dir_for(&self, name: &str) -> PathBuf {
        let mapped = self
            .entries
            .iter()
            .fold(name.to_string(), |acc, (pattern, replacement)| acc.replace(pattern, replacement));

        mapped.split(['.', '/']).filter(|part| !part.is_empty()).collect()
    }

    /// Source directory of `name` below `source_root`.
    pub fn source_dir_for(&self, source_root: &Path, name: &str) -> PathBuf {
        source_root.join(self.relative_dir_for(name))
    }
}

impl From<&[PathMappingEntry]> for PathMapping {
    fn from(entries: &[PathMappingEntry]) -> Self {
        Self::new(entries.iter().map(|e| (e.pattern.clone(), e.replacement.clone())))
    }
}
