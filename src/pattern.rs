//! Unit selection for aggregate descriptors and glob scans for folder groupings.
//!
//! # Unit selection
//!
//! An aggregate descriptor is configured with a comma-separated list of
//! patterns. Each pattern is tried against a unit in this order:
//!
//! 1. **Prefix**: the unit name starts with the pattern (`Ict.Petra.Server`)
//! 2. **Exact descriptor file**: the pattern equals the unit's descriptor
//!    file name (`PetraClient.csproj`)
//! 3. **Regex**: the pattern, anchored at both ends, matches the unit name
//!    (`Ict\.Tools\..*Generator`)
//!
//! A unit belongs to the aggregate if any pattern matches it.
//!
//! # Folder scans
//!
//! [`PatternMatcher`] walks a directory with `walkdir` and keeps files whose
//! path relative to the base matches a glob.

use glob::Pattern;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::core::{BuildUnit, GenerationError};

/// One entry of a selection list.
#[derive(Debug, Clone)]
struct SelectionPattern {
    text: String,
    /// `None` when the text is not a valid regex; prefix and exact matching still apply
    regex: Option<Regex>,
}

impl SelectionPattern {
    fn selects(&self, unit: &BuildUnit, descriptor_file: &str) -> bool {
        unit.name.starts_with(&self.text)
            || self.text == descriptor_file
            || self.regex.as_ref().is_some_and(|re| re.is_match(&unit.name))
    }
}

/// Selects the units that belong to one aggregate descriptor.
#[derive(Debug, Clone)]
pub struct UnitSelector {
    patterns: Vec<SelectionPattern>,
}

impl UnitSelector {
    /// Parse a comma-separated pattern list. Empty entries are ignored.
    pub fn parse(list: &str) -> Self {
        let patterns = list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|text| {
                let regex = Regex::new(&format!("^(?:{text})$")).ok();
                if regex.is_none() {
                    debug!("Selection pattern '{}' is not a valid regex; using prefix/exact only", text);
                }
                SelectionPattern {
                    text: text.to_string(),
                    regex,
                }
            })
            .collect();

        Self {
            patterns,
        }
    }

    /// True if any pattern selects `unit`. `descriptor_file` is the unit's
    /// emitted file name, e.g. `PetraClient.csproj`.
    pub fn matches(&self, unit: &BuildUnit, descriptor_file: &str) -> bool {
        self.matching_pattern(unit, descriptor_file).is_some()
    }

    /// The first pattern that selects `unit`.
    pub fn matching_pattern(&self, unit: &BuildUnit, descriptor_file: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.selects(unit, descriptor_file))
            .map(|p| p.text.as_str())
    }

    /// Patterns that select none of `candidates` (unit plus descriptor file name).
    pub fn unused_patterns<'a>(&'a self, candidates: &[(&BuildUnit, String)]) -> Vec<&'a str> {
        self.patterns
            .iter()
            .filter(|p| !candidates.iter().any(|(unit, file)| p.selects(unit, file)))
            .map(|p| p.text.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Glob matcher for files below a directory.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compile a glob pattern such as `*.yml` or `**/*.sql`.
    pub fn new(pattern_str: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            pattern: Pattern::new(pattern_str)?,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// Files below `base_path` whose relative path matches, sorted.
    ///
    /// Symlinks are not followed. Directories are never returned.
    pub fn find_matches(&self, base_path: &Path) -> Result<Vec<PathBuf>, GenerationError> {
        debug!("Searching for pattern '{}' in {}", self.original_pattern, base_path.display());

        let mut matches = Vec::new();
        for entry in WalkDir::new(base_path).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(base_path).to_path_buf();
                GenerationError::io("scan directory", path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative_path) = entry.path().strip_prefix(base_path) {
                let relative_str = relative_path.to_string_lossy().replace('\\', "/");
                trace!("Checking path: {}", relative_str);

                if self.pattern.matches(&relative_str) {
                    matches.push(relative_path.to_path_buf());
                }
            }
        }

        matches.sort();
        debug!("Found {} matches for pattern '{}'", matches.len(), self.original_pattern);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OutputType;
    use std::fs;
    use tempfile::TempDir;

    fn unit(name: &str) -> BuildUnit {
        BuildUnit::new(name, OutputType::Library)
    }

    #[test]
    fn test_prefix_selection() {
        let selector = UnitSelector::parse("Ict.Common, Ict.Petra.Server");
        assert!(selector.matches(&unit("Ict.Common.IO"), "Ict.Common.IO.csproj"));
        assert!(selector.matches(&unit("Ict.Petra.Server.lib.MPartner"), "x.csproj"));
        assert!(!selector.matches(&unit("Ict.Petra.Client"), "Ict.Petra.Client.csproj"));
    }

    #[test]
    fn test_exact_descriptor_file_selection() {
        let selector = UnitSelector::parse("PetraClient.csproj");
        let mut client = unit("Ict.Petra.Client");
        client.output_name_override = Some("PetraClient".to_string());
        assert!(selector.matches(&client, "PetraClient.csproj"));
        assert!(!selector.matches(&unit("Other"), "Other.csproj"));
    }

    #[test]
    fn test_regex_selection_is_anchored() {
        let selector = UnitSelector::parse(r"Ict\.Tools\..*Generator");
        assert!(selector.matches(&unit("Ict.Tools.CodeGenerator"), "a.csproj"));
        assert!(!selector.matches(&unit("Ict.Tools.CodeGenerator.Tests"), "b.csproj"));
    }

    #[test]
    fn test_invalid_regex_still_matches_as_prefix() {
        let selector = UnitSelector::parse("Ict.Common(");
        assert!(selector.matches(&unit("Ict.Common(Legacy)"), "x.csproj"));
        assert!(!selector.matches(&unit("Ict.Common"), "x.csproj"));
    }

    #[test]
    fn test_matching_pattern_reports_first_match() {
        let selector = UnitSelector::parse("Ict.Petra,Ict");
        assert_eq!(
            selector.matching_pattern(&unit("Ict.Petra.Shared"), "x.csproj"),
            Some("Ict.Petra")
        );
    }

    #[test]
    fn test_unused_patterns() {
        let selector = UnitSelector::parse("Ict.Common,Ict.Petra,Ict.Comon");
        let common = unit("Ict.Common");
        let candidates = vec![(&common, "Ict.Common.csproj".to_string())];
        assert_eq!(selector.unused_patterns(&candidates), vec!["Ict.Petra", "Ict.Comon"]);
    }

    #[test]
    fn test_empty_entries_ignored() {
        let selector = UnitSelector::parse(" , ,");
        assert!(selector.is_empty());
        assert!(!selector.matches(&unit("Anything"), "Anything.csproj"));
    }

    #[test]
    fn test_find_matches_in_directory_structure() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("sub")).unwrap();
        fs::write(base.join("petra.yml"), "").unwrap();
        fs::write(base.join("sub/nested.yml"), "").unwrap();
        fs::write(base.join("readme.txt"), "").unwrap();

        let top = PatternMatcher::new("*.yml").unwrap().find_matches(base).unwrap();
        assert!(top.contains(&PathBuf::from("petra.yml")));

        let all = PatternMatcher::new("**/*.yml").unwrap().find_matches(base).unwrap();
        assert_eq!(all, vec![PathBuf::from("petra.yml"), PathBuf::from("sub/nested.yml")]);

        let everything = PatternMatcher::new("*").unwrap().find_matches(base).unwrap();
        assert!(everything.contains(&PathBuf::from("readme.txt")));
        assert!(!everything.contains(&PathBuf::from("sub")));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(PatternMatcher::new("[").is_err());
    }
}
