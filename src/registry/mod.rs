//! Persistent name → GUID registry.
//!
//! Every unit (and every solution folder) needs an identifier that stays the
//! same across runs, otherwise IDEs treat regenerated projects as new ones.
//! The registry is a plain `name=id` file:
//!
//! ```text
//! # Generated by projgen on 2026-10-16 09:12:44 UTC
//! Ict.Common=3F2504E0-4F89-41D3-9A0C-0305E82C3301
//! Ict.Common.IO=8C1B2A7E-5E0B-4D4E-9C61-7B0C2E8F5A10
//! ```
//!
//! Ids are created lazily and never removed: entries for deleted units stay in
//! the file so the ids of everything else never change.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::GenerationError;
use crate::utils::fs::atomic_write;

/// In-memory identity registry for one run.
#[derive(Debug, Default, Clone)]
pub struct IdentityRegistry {
    entries: BTreeMap<String, String>,
    created: usize,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry file. A missing file yields an empty registry.
    ///
    /// Blank lines and lines starting with `#` are skipped. Lines without `=`
    /// are skipped with a warning.
    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        if !path.exists() {
            debug!("No registry at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content =
            fs::read_to_string(path).map_err(|e| GenerationError::io("read registry", path, e))?;

        let mut registry = Self::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.rsplit_once('=') {
                Some((name, id)) if !name.trim().is_empty() && !id.trim().is_empty() => {
                    registry.entries.insert(name.trim().to_string(), id.trim().to_string());
                }
                _ => warn!("Ignoring malformed registry line {}:{}", path.display(), index + 1),
            }
        }

        debug!("Loaded {} ids from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Return the id for `name`, creating one on first use.
    pub fn resolve(&mut self, name: &str) -> String {
        if let Some(id) = self.entries.get(name) {
            return id.clone();
        }

        let id = Uuid::new_v4().hyphenated().to_string().to_uppercase();
        debug!("Assigned new id {} to {}", id, name);
        self.entries.insert(name.to_string(), id.clone());
        self.created += 1;
        id
    }

    /// Id for `name` if one exists, without creating it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of ids created since this registry was loaded.
    pub fn newly_assigned(&self) -> usize {
        self.created
    }

    /// Overwrite `path` with a timestamped header and every entry, sorted by name.
    ///
    /// Call only after every `resolve` of the run.
    pub fn save(&self, path: &Path) -> Result<(), GenerationError> {
        let mut content = format!(
            "# Generated by projgen on {}\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        for (name, id) in &self.entries {
            content.push_str(name);
            content.push('=');
            content.push_str(id);
            content.push('\n');
        }

        atomic_write(path, content.as_bytes())
            .map_err(|e| GenerationError::io("write registry", path, e))?;
        debug!("Saved {} ids to {}", self.len(), path.display());
        Ok(())
    }
}
