//! Artifact emission and the generation pass.
//!
//! [`Generator::run`] is the only entry point with side effects on the output
//! tree. One pass runs strictly in this order:
//!
//! 1. Load the dependency map
//! 2. Load the identity registry
//! 3. Load the template set of the selected environment
//! 4. Emit one descriptor per unit (order independent)
//! 5. Compute the build order
//! 6. Emit every configured solution in that order
//! 7. Save the registry
//!
//! Any fatal error aborts the pass before the registry is saved, so ids handed
//! out by a failed run are never persisted.

pub mod mapping;
pub mod project;
pub mod solution;
pub mod sources;

pub use mapping::PathMapping;
pub use project::ProjectEmitter;
pub use solution::SolutionEmitter;
pub use sources::{SourceEntry, SourceKind};

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::core::{BuildUnit, GenerationError};
use crate::graph::{DependencyMap, Sequencer};
use crate::registry::IdentityRegistry;
use crate::templating::{TemplateCache, TemplateSet, find_unresolved, suggest_similar};
use crate::utils::{atomic_write, ensure_dir};

/// File name of the descriptor for `unit`: `<effective output name>.<extension>`.
pub fn descriptor_file_name(unit: &BuildUnit, extension: &str) -> String {
    format!("{}.{}", unit.effective_output_name(), extension)
}

/// Write `text` to `path` unless it still contains placeholders.
///
/// Invalid output goes to `<path>.error` instead, any earlier file at `path`
/// is removed, and [`GenerationError::UnresolvedPlaceholder`] names the
/// `.error` file.
pub fn write_validated(path: &Path, text: &str) -> Result<(), GenerationError> {
    let unresolved = find_unresolved(text);
    if unresolved.is_empty() {
        return atomic_write(path, text.as_bytes())
            .map_err(|e| GenerationError::io("write descriptor", path, e));
    }

    let mut error_name = path.as_os_str().to_os_string();
    error_name.push(".error");
    let error_path = PathBuf::from(error_name);

    atomic_write(&error_path, text.as_bytes())
        .map_err(|e| GenerationError::io("write rejected descriptor", &error_path, e))?;
    if path.exists() {
        fs::remove_file(path).map_err(|e| GenerationError::io("remove stale descriptor", path, e))?;
    }

    Err(GenerationError::UnresolvedPlaceholder {
        file: error_path,
        placeholders: unresolved,
    })
}

/// Log a "did you mean" line for each unresolved placeholder close to a known one.
pub(crate) fn hint_unresolved(error: &GenerationError, known: &[&str]) {
    if let GenerationError::UnresolvedPlaceholder {
        file,
        placeholders,
    } = error
    {
        for name in placeholders {
            let similar = suggest_similar(name, known.iter().copied());
            if !similar.is_empty() {
                warn!("${{{}}} in {}: did you mean {}?", name, file.display(), similar.join(", "));
            }
        }
    }
}

/// What a successful pass produced.
#[derive(Debug, Default, Clone, Serialize)]
pub struct GenerationReport {
    /// Written project descriptors
    pub projects: Vec<PathBuf>,
    /// Written solution descriptors
    pub solutions: Vec<PathBuf>,
    /// Ids created during this pass
    pub new_ids: usize,
    /// Build order of every unit
    pub order: Vec<String>,
}

/// Result of a dry validation pass.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub units: usize,
    pub project_edges: usize,
    pub order: Vec<String>,
    pub template_dir: PathBuf,
}

/// Drives one generation pass over a [`GeneratorConfig`].
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the whole pass and save the registry.
    pub fn run(&self) -> Result<GenerationReport, GenerationError> {
        let config = &self.config;

        info!("Loading dependency map {}", config.dependency_map.display());
        let map = DependencyMap::load(&config.dependency_map)?;
        let mut registry = IdentityRegistry::load(&config.registry)?;

        let template_dir = config.environment_template_dir();
        info!("Using templates from {}", template_dir.display());
        let mut cache = TemplateCache::new();
        let templates = TemplateSet::load(&mut cache, &template_dir)?;

        let output_dir = config.environment_output_dir();
        ensure_dir(&output_dir)
            .map_err(|e| GenerationError::io("create output directory", &output_dir, e))?;

        let mut report = GenerationReport::default();

        info!("Generating {} project descriptors", map.len());
        let projects = ProjectEmitter::new(config, &map, &templates);
        for unit in map.units() {
            report.projects.push(projects.emit_unit(unit, &mut registry)?);
        }

        let sequencer = Sequencer::new(&map);
        debug!("{} project-to-project edges", sequencer.edge_count());
        report.order = sequencer.order()?;

        if !config.solutions.is_empty() {
            info!("Generating {} solutions", config.solutions.len());
        }
        let solutions = SolutionEmitter::new(config, &map, &templates, &report.order);
        for solution in &config.solutions {
            report.solutions.push(solutions.emit(solution, &mut registry)?);
        }

        report.new_ids = registry.newly_assigned();
        registry.save(&config.registry)?;

        let (hits, misses) = cache.stats();
        debug!("Template cache: {} hits, {} misses", hits, misses);
        info!(
            "Generated {} projects and {} solutions ({} new ids)",
            report.projects.len(),
            report.solutions.len(),
            report.new_ids
        );
        Ok(report)
    }

    /// Load the map, order it and load the template set without writing anything.
    pub fn check(&self) -> Result<CheckReport, GenerationError> {
        let map = DependencyMap::load(&self.config.dependency_map)?;
        let sequencer = Sequencer::new(&map);
        let order = sequencer.order()?;

        let template_dir = self.config.environment_template_dir();
        TemplateSet::load(&mut TemplateCache::new(), &template_dir)?;

        Ok(CheckReport {
            units: map.len(),
            project_edges: sequencer.edge_count(),
            order,
            template_dir,
        })
    }
}
