//! Read-through cache for template files.
//!
//! Templates are assumed static for the duration of a run: the first read of
//! a path populates the cache and later reads never touch the disk again.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::GenerationError;

/// Template text keyed by file path.
#[derive(Debug, Default)]
pub struct TemplateCache {
    /// `None` records a path that was looked up and does not exist
    entries: HashMap<PathBuf, Option<String>>,
    hits: usize,
    misses: usize,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a required template.
    ///
    /// # Errors
    ///
    /// [`GenerationError::MissingTemplate`] if the file does not exist.
    pub fn load(&mut self, path: &Path) -> Result<&str, GenerationError> {
        match self.load_optional(path)? {
            Some(text) => Ok(text),
            None => Err(GenerationError::MissingTemplate {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Load a template that may legitimately be absent.
    pub fn load_optional(&mut self, path: &Path) -> Result<Option<&str>, GenerationError> {
        if self.entries.contains_key(path) {
            self.hits += 1;
            trace!("Template cache hit: {}", path.display());
        } else {
            self.misses += 1;
            let text = if path.is_file() {
                let text = fs::read_to_string(path)
                    .map_err(|e| GenerationError::io("read template", path, e))?;
                debug!("Loaded template {} ({} bytes)", path.display(), text.len());
                Some(text)
            } else {
                debug!("Template {} not present", path.display());
                None
            };
            self.entries.insert(path.to_path_buf(), text);
        }

        Ok(self.entries.get(path).and_then(|text| text.as_deref()))
    }

    /// (hits, misses)
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
