//! The fixed set of template files for one target environment.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::cache::TemplateCache;
use crate::core::GenerationError;

/// Per-unit descriptor.
pub const PROJECT: &str = "project.template";
/// Project-to-project reference entry.
pub const PROJECT_REFERENCE: &str = "projectreference.template";
/// External (file) reference entry.
pub const REFERENCE: &str = "reference.template";
/// Compile entry.
pub const COMPILE: &str = "compile.template";
/// Compile entry nested under another file.
pub const COMPILE_DEPENDENT: &str = "compile.dependent.template";
/// Resource entry (optional).
pub const RESOURCE: &str = "resource.template";
/// Aggregate descriptor.
pub const SOLUTION: &str = "solution.template";
/// Aggregate per-unit entry.
pub const SOLUTION_PROJECT: &str = "solution.project.template";
/// Aggregate per-unit configuration entry (optional).
pub const SOLUTION_CONFIG: &str = "solution.config.template";
/// Aggregate folder grouping (optional).
pub const SOLUTION_FOLDER: &str = "solution.folder.template";
/// One file inside a folder grouping (optional).
pub const SOLUTION_FOLDER_ITEM: &str = "solution.folderitem.template";

/// Template texts for one environment.
///
/// Optional templates that are absent disable their feature: no resource
/// entries, no configuration entries, or no folder groupings.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub dir: PathBuf,
    pub project: String,
    pub project_reference: String,
    pub reference: String,
    pub compile: String,
    pub compile_dependent: String,
    pub resource: Option<String>,
    pub solution: String,
    pub solution_project: String,
    pub solution_config: Option<String>,
    /// Folder and folder item templates; folders need both
    pub solution_folder: Option<(String, String)>,
}

impl TemplateSet {
    /// Load every template from `dir` through `cache`.
    ///
    /// # Errors
    ///
    /// [`GenerationError::MissingTemplate`] for the first absent required template.
    pub fn load(cache: &mut TemplateCache, dir: &Path) -> Result<Self, GenerationError> {
        let mut required = |name: &str| cache.load(&dir.join(name)).map(str::to_string);
        let project = required(PROJECT)?;
        let project_reference = required(PROJECT_REFERENCE)?;
        let reference = required(REFERENCE)?;
        let compile = required(COMPILE)?;
        let compile_dependent = required(COMPILE_DEPENDENT)?;
        let solution = required(SOLUTION)?;
        let solution_project = required(SOLUTION_PROJECT)?;

        let mut optional = |name: &str| {
            cache.load_optional(&dir.join(name)).map(|text| text.map(str::to_string))
        };
        let resource = optional(RESOURCE)?;
        let solution_config = optional(SOLUTION_CONFIG)?;
        let folder = optional(SOLUTION_FOLDER)?;
        let folder_item = optional(SOLUTION_FOLDER_ITEM)?;

        let solution_folder = match (folder, folder_item) {
            (Some(folder), Some(item)) => Some((folder, item)),
            (None, None) => None,
            _ => {
                debug!("Folder groupings disabled: need both {SOLUTION_FOLDER} and {SOLUTION_FOLDER_ITEM}");
                None
            }
        };

        debug!(
            "Loaded template set from {} (resources: {}, configurations: {}, folders: {})",
            dir.display(),
            resource.is_some(),
            solution_config.is_some(),
            solution_folder.is_some()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            project,
            project_reference,
            reference,
            compile,
            compile_dependent,
            resource,
            solution,
            solution_project,
            solution_config,
            solution_folder,
        })
    }
}
