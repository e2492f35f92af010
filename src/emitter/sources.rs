//! Source file enumeration for one unit.
//!
//! Only the top level of the unit's source directory is scanned. Companion
//! files (`Form.Designer.cs`, `Form.ManualCode.cs`, `Form.resx`) are nested
//! under their main file when it exists. `AssemblyInfo` files on disk are
//! ignored: the shared assembly info file is always injected first.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Compile,
    Resource,
}

/// One file entry of a project descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// File name of the main file this entry is nested under
    pub dependent_upon: Option<String>,
}

/// What counts as a source, resource or companion file.
#[derive(Debug, Clone)]
pub struct SourceOptions<'a> {
    pub source_extension: &'a str,
    pub resource_extension: &'a str,
    pub companion_suffixes: &'a [String],
    pub assembly_info: Option<&'a Path>,
}

/// Enumerate the entries of `dir` in descriptor order.
///
/// A missing directory yields only the assembly info entry.
pub fn collect(dir: &Path, options: &SourceOptions<'_>) -> Result<Vec<SourceEntry>, GenerationError> {
    let mut entries = Vec::new();

    if let Some(info) = options.assembly_info {
        entries.push(SourceEntry {
            path: info.to_path_buf(),
            kind: SourceKind::Compile,
            dependent_upon: None,
        });
    }

    if !dir.is_dir() {
        warn!("Source directory {} does not exist", dir.display());
        return Ok(entries);
    }

    let mut files = BTreeSet::new();
    let read_dir = fs::read_dir(dir).map_err(|e| GenerationError::io("scan source directory", dir, e))?;
    for entry in read_dir {
        let entry = entry.map_err(|e| GenerationError::io("scan source directory", dir, e))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file {
            files.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }

    let source_suffix = format!(".{}", options.source_extension);
    let resource_suffix = format!(".{}", options.resource_extension);
    let assembly_info_name = format!("AssemblyInfo{source_suffix}");

    for name in &files {
        if name.eq_ignore_ascii_case(&assembly_info_name) {
            debug!("Skipping {} in {}; shared assembly info is used", name, dir.display());
            continue;
        }

        let entry = if name.ends_with(&source_suffix) {
            SourceEntry {
                path: dir.join(name),
                kind: SourceKind::Compile,
                dependent_upon: companion_parent(name, options.companion_suffixes, &source_suffix, &files),
            }
        } else if let Some(stem) = name.strip_suffix(&resource_suffix) {
            let parent = format!("{stem}{source_suffix}");
            SourceEntry {
                path: dir.join(name),
                kind: SourceKind::Resource,
                dependent_upon: files.contains(&parent).then_some(parent),
            }
        } else {
            continue;
        };
        entries.push(entry);
    }

    debug!("Collected {} entries from {}", entries.len(), dir.display());
    Ok(entries)
}

fn companion_parent(
    name: &str,
    suffixes: &[String],
    source_suffix: &str,
    files: &BTreeSet<String>,
) -> Option<String> {
    suffixes.iter().find_map(|suffix| {
        let stem = name.strip_suffix(suffix.as_str()).filter(|stem| !stem.is_empty())?;
        let parent = format!("{stem}{source_suffix}");
        (parent != name && files.contains(&parent)).then_some(parent)
    })
}
