//! Dependency map loading and lookup.
//!
//! The dependency map is a line-oriented file produced by an earlier build
//! step. Each unit starts with a header line followed by its indented
//! references:
//!
//! ```text
//! # comment
//! Ict.Common,Library
//!   System.Xml
//! Ict.Common.IO,Library
//!   Ict.Common
//! Ict.Petra.Client,WinExe,PetraClient
//!   Ict.Common.IO
//! ```
//!
//! Indented lines starting with `#` are comments too; they never become
//! references.
//!
//! A reference that names another unit (directly, or through that unit's
//! output name) is a project-to-project edge. Anything else is an external
//! reference.

pub mod sequencer;

pub use sequencer::Sequencer;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::{BuildUnit, GenerationError, OutputType};

/// All build units of one run plus the output-name index.
#[derive(Debug, Default, Clone)]
pub struct DependencyMap {
    units: BTreeMap<String, BuildUnit>,
    /// Effective output name -> unit name
    output_index: HashMap<String, String>,
}

impl DependencyMap {
    /// Read and parse the map file.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::MissingDependencyMap`] if the file does not exist
    /// - [`GenerationError::MalformedDependencyMap`] for unparseable lines
    /// - [`GenerationError::Io`] if the file cannot be read
    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        if !path.exists() {
            return Err(GenerationError::MissingDependencyMap {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)
            .map_err(|e| GenerationError::io("read dependency map", path, e))?;
        let map = Self::parse(path, &content)?;
        debug!("Loaded {} build units from {}", map.len(), path.display());
        Ok(map)
    }

    /// Parse map text. `path` is only used in error messages.
    pub fn parse(path: &Path, content: &str) -> Result<Self, GenerationError> {
        let mut map = Self::default();
        // Unit being read plus the line of its header
        let mut current: Option<(BuildUnit, usize)> = None;

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let malformed = |reason: &str| GenerationError::MalformedDependencyMap {
                path: path.to_path_buf(),
                line: line_no,
                reason: reason.to_string(),
            };

            if line.trim().is_empty() {
                continue;
            }

            let indented = line.starts_with(char::is_whitespace);
            if indented {
                let reference = line.trim();
                if reference.starts_with('#') {
                    continue;
                }
                match current.as_mut() {
                    Some((unit, _)) => unit.references.push(reference.to_string()),
                    None => return Err(malformed("reference line before any unit header")),
                }
                continue;
            }

            if line.starts_with('#') {
                continue;
            }

            if let Some((unit, header_line)) = current.take() {
                map.insert(unit, path, header_line)?;
            }

            let mut fields = line.split(',').map(str::trim);
            let name = fields.next().unwrap_or_default();
            if name.is_empty() {
                return Err(malformed("unit header without a name"));
            }
            if name.contains('=') {
                return Err(malformed(&format!("unit name '{name}' contains '='")));
            }
            let Some(output_type) = fields.next().filter(|t| !t.is_empty()) else {
                return Err(malformed(&format!("unit '{name}' has no output type")));
            };
            let mut unit = BuildUnit::new(name, OutputType::from(output_type));
            unit.output_name_override =
                fields.next().filter(|o| !o.is_empty()).map(str::to_string);
            current = Some((unit, line_no));
        }

        if let Some((unit, header_line)) = current.take() {
            map.insert(unit, path, header_line)?;
        }

        Ok(map)
    }

    /// Every unit needs its own descriptor file and an unambiguous reference
    /// name, so unit names and output names must not collide.
    fn insert(&mut self, unit: BuildUnit, path: &Path, line: usize) -> Result<(), GenerationError> {
        let malformed = |reason: String| GenerationError::MalformedDependencyMap {
            path: path.to_path_buf(),
            line,
            reason,
        };

        if self.units.contains_key(&unit.name) {
            return Err(malformed(format!("unit '{}' is declared more than once", unit.name)));
        }
        let output = unit.effective_output_name();
        if let Some(owner) = self.output_index.get(output) {
            return Err(malformed(format!(
                "output name '{output}' of unit '{}' is already used by unit '{owner}'",
                unit.name
            )));
        }
        if output != unit.name && self.units.contains_key(output) {
            return Err(malformed(format!(
                "output name '{output}' of unit '{}' is the name of another unit",
                unit.name
            )));
        }
        if let Some(owner) = self.output_index.get(&unit.name) {
            return Err(malformed(format!(
                "unit name '{}' is already the output name of unit '{owner}'",
                unit.name
            )));
        }
        self.output_index.insert(unit.effective_output_name().to_string(), unit.name.clone());
        self.units.insert(unit.name.clone(), unit);
        Ok(())
    }

    /// Add a unit programmatically. A unit with the same name is replaced.
    pub fn add_unit(&mut self, unit: BuildUnit) {
        if let Some(old) = self.units.get(&unit.name) {
            self.output_index.remove(old.effective_output_name());
        }
        self.output_index.insert(unit.effective_output_name().to_string(), unit.name.clone());
        self.units.insert(unit.name.clone(), unit);
    }

    /// All units, sorted by name.
    pub fn units(&self) -> impl Iterator<Item = &BuildUnit> {
        self.units.values()
    }

    /// Unit names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&BuildUnit> {
        self.units.get(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Canonical unit name for an effective output name.
    pub fn name_for_output(&self, output_name: &str) -> Option<&str> {
        self.output_index.get(output_name).map(String::as_str)
    }

    /// Resolve a reference to a unit: by unit name first, then by output name.
    pub fn resolve_reference(&self, reference: &str) -> Option<&BuildUnit> {
        self.units
            .get(reference)
            .or_else(|| self.name_for_output(reference).and_then(|name| self.units.get(name)))
    }

    /// Units that `unit` references, deduplicated, in declaration order.
    pub fn project_dependencies<'a>(&'a self, unit: &'a BuildUnit) -> Vec<&'a BuildUnit> {
        let mut seen = HashSet::new();
        unit.references
            .iter()
            .filter_map(|reference| self.resolve_reference(reference))
            .filter(|dep| seen.insert(dep.name.as_str()))
            .collect()
    }

    /// References of `unit` that are not build units.
    pub fn external_references<'a>(&'a self, unit: &'a BuildUnit) -> Vec<&'a str> {
        unit.references
            .iter()
            .filter(|reference| self.resolve_reference(reference).is_none())
            .map(String::as_str)
            .collect()
    }
}
