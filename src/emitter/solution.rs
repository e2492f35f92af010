//! Aggregate (solution) descriptors.
//!
//! A solution lists a filtered subset of the units in build order, plus
//! optional folder groupings whose members come from directory scans.

use std::path::PathBuf;
use tracing::{debug, warn};

use super::{descriptor_file_name, hint_unresolved, write_validated};
use crate::config::{FolderConfig, GeneratorConfig, SolutionConfig};
use crate::core::{BuildUnit, GenerationError};
use crate::graph::DependencyMap;
use crate::pattern::{PatternMatcher, UnitSelector};
use crate::registry::IdentityRegistry;
use crate::templating::{Codelets, Substitutions, TemplateSet, render, suggest_similar};
use crate::utils::{descriptor_path, relative_path};

const PROJECTS: &str = "Projects";
const PROJECT_CONFIGURATIONS: &str = "ProjectConfigurations";
const FOLDERS: &str = "Folders";
const FOLDER_ITEMS: &str = "FolderItems";

/// Every placeholder the solution-side templates can use.
pub const SOLUTION_PLACEHOLDERS: &[&str] = &[
    "SolutionName",
    PROJECTS,
    PROJECT_CONFIGURATIONS,
    FOLDERS,
    "ProjectName",
    "ProjectFile",
    "ProjectGuid",
    "FolderName",
    "FolderGuid",
    FOLDER_ITEMS,
    "Filename",
];

/// Registry key of a folder grouping's id.
pub fn folder_registry_key(folder: &str) -> String {
    format!("folder:{folder}")
}

/// Renders and writes aggregate descriptors.
pub struct SolutionEmitter<'a> {
    config: &'a GeneratorConfig,
    map: &'a DependencyMap,
    templates: &'a TemplateSet,
    /// Build order of every unit in the map
    order: &'a [String],
    output_dir: PathBuf,
}

impl<'a> SolutionEmitter<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        map: &'a DependencyMap,
        templates: &'a TemplateSet,
        order: &'a [String],
    ) -> Self {
        Self {
            config,
            map,
            templates,
            order,
            output_dir: config.environment_output_dir(),
        }
    }

    pub fn solution_path(&self, solution: &SolutionConfig) -> PathBuf {
        self.output_dir.join(format!("{}.{}", solution.name, self.config.solution_extension))
    }

    /// Units selected by `solution`, in build order.
    pub fn select(&self, solution: &SolutionConfig) -> Vec<&'a BuildUnit> {
        let selector = UnitSelector::parse(&solution.include);
        let candidates: Vec<(&BuildUnit, String)> = self
            .order
            .iter()
            .filter_map(|name| self.map.get(name))
            .map(|unit| (unit, descriptor_file_name(unit, &self.config.project_extension)))
            .collect();

        for pattern in selector.unused_patterns(&candidates) {
            let similar = suggest_similar(pattern, self.map.names());
            if similar.is_empty() {
                warn!("Pattern '{}' of solution {} selects no project", pattern, solution.name);
            } else {
                warn!(
                    "Pattern '{}' of solution {} selects no project; did you mean {}?",
                    pattern,
                    solution.name,
                    similar.join(", ")
                );
            }
        }

        let map = self.map;
        self.order
            .iter()
            .filter_map(|name| map.get(name))
            .filter(|unit| {
                selector.matches(unit, &descriptor_file_name(unit, &self.config.project_extension))
            })
            .collect()
    }

    /// Render and write the descriptor for `solution`.
    pub fn emit(
        &self,
        solution: &SolutionConfig,
        registry: &mut IdentityRegistry,
    ) -> Result<PathBuf, GenerationError> {
        let path = self.solution_path(solution);
        let text = self.render(solution, registry)?;
        write_validated(&path, &text).inspect_err(|e| hint_unresolved(e, SOLUTION_PLACEHOLDERS))?;
        debug!("Wrote solution {}", path.display());
        Ok(path)
    }

    /// Render the descriptor text for `solution` without writing it.
    pub fn render(
        &self,
        solution: &SolutionConfig,
        registry: &mut IdentityRegistry,
    ) -> Result<String, GenerationError> {
        let mut codelets = Codelets::declare([PROJECTS, PROJECT_CONFIGURATIONS, FOLDERS]);

        let units = self.select(solution);
        debug!("Solution {} lists {} projects", solution.name, units.len());
        for unit in units {
            let mut vars = Substitutions::new();
            vars.insert("ProjectName", unit.effective_output_name())
                .insert("ProjectFile", descriptor_file_name(unit, &self.config.project_extension))
                .insert("ProjectGuid", registry.resolve(&unit.name));

            codelets.append(PROJECTS, &render(&self.templates.solution_project, &vars));
            if let Some(template) = &self.templates.solution_config {
                codelets.append(PROJECT_CONFIGURATIONS, &render(template, &vars));
            }
        }

        for name in &solution.folders {
            let Some(folder) = self.config.folder(name) else {
                warn!("Solution {} uses undefined folder {}", solution.name, name);
                continue;
            };
            if let Some(fragment) = self.render_folder(folder, registry)? {
                codelets.append(FOLDERS, &fragment);
            }
        }

        let mut vars = Substitutions::new();
        vars.insert("SolutionName", solution.name.as_str());
        codelets.apply_to(&mut vars);
        Ok(render(&self.templates.solution, &vars))
    }

    /// `None` when the template set has no folder templates.
    fn render_folder(
        &self,
        folder: &FolderConfig,
        registry: &mut IdentityRegistry,
    ) -> Result<Option<String>, GenerationError> {
        let Some((folder_template, item_template)) = &self.templates.solution_folder else {
            debug!("No folder templates, skipping folder {}", folder.name);
            return Ok(None);
        };

        let mut items = Codelets::declare([FOLDER_ITEMS]);
        if folder.path.is_dir() {
            let matcher =
                PatternMatcher::new(&folder.pattern).map_err(|e| GenerationError::InvalidConfig {
                    path: folder.path.clone(),
                    reason: format!("folder '{}' has an invalid pattern: {e}", folder.name),
                })?;
            for file in matcher.find_matches(&folder.path)? {
                let absolute = folder.path.join(&file);
                let mut vars = Substitutions::new();
                vars.insert("Filename", descriptor_path(&relative_path(&self.output_dir, &absolute)));
                items.append(FOLDER_ITEMS, &render(item_template, &vars));
            }
        } else {
            warn!("Folder {} scans missing directory {}", folder.name, folder.path.display());
        }

        let mut vars = Substitutions::new();
        vars.insert("FolderName", folder.name.as_str())
            .insert("FolderGuid", registry.resolve(&folder_registry_key(&folder.name)));
        items.apply_to(&mut vars);
        Ok(Some(render(folder_template, &vars)))
    }
}
