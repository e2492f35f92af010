//! Per-unit project descriptors.
//!
//! Each descriptor is composed bottom-up: one fragment per project reference,
//! external reference, compile file and resource is rendered into its codelet,
//! and the project template consumes the codelets as single values.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::sources::{self, SourceKind, SourceOptions};
use super::{PathMapping, descriptor_file_name, hint_unresolved, write_validated};
use crate::config::GeneratorConfig;
use crate::core::{BuildUnit, GenerationError};
use crate::graph::DependencyMap;
use crate::registry::IdentityRegistry;
use crate::templating::{Codelets, Substitutions, TemplateSet, render};
use crate::utils::{descriptor_path, relative_path};

const PROJECT_REFERENCES: &str = "ProjectReferences";
const REFERENCES: &str = "References";
const COMPILE_FILES: &str = "CompileFiles";
const RESOURCES: &str = "Resources";

/// Every placeholder the project-side templates can use.
pub const PROJECT_PLACEHOLDERS: &[&str] = &[
    "ProjectGuid",
    "OutputType",
    "Namespace",
    "AssemblyName",
    "FrameworkVersion",
    "OutputPath",
    PROJECT_REFERENCES,
    REFERENCES,
    COMPILE_FILES,
    RESOURCES,
    "ProjectName",
    "ProjectFile",
    "Reference",
    "HintPath",
    "Filename",
    "DependentUpon",
];

/// Renders and writes one descriptor per build unit.
///
/// Emission does not depend on the build order; every unit can be emitted
/// independently.
pub struct ProjectEmitter<'a> {
    config: &'a GeneratorConfig,
    map: &'a DependencyMap,
    templates: &'a TemplateSet,
    mapping: PathMapping,
    output_dir: PathBuf,
}

impl<'a> ProjectEmitter<'a> {
    pub fn new(config: &'a GeneratorConfig, map: &'a DependencyMap, templates: &'a TemplateSet) -> Self {
        Self {
            config,
            map,
            templates,
            mapping: PathMapping::from(config.path_mapping.as_slice()),
            output_dir: config.environment_output_dir(),
        }
    }

    /// Where the descriptor of `unit` is written.
    pub fn descriptor_path_for(&self, unit: &BuildUnit) -> PathBuf {
        self.output_dir.join(descriptor_file_name(unit, &self.config.project_extension))
    }

    /// Render and write the descriptor of `unit`.
    ///
    /// # Errors
    ///
    /// [`GenerationError::UnresolvedPlaceholder`] if the rendered text still
    /// contains placeholders; the output is written next to the target with
    /// an `.error` suffix instead.
    pub fn emit_unit(
        &self,
        unit: &BuildUnit,
        registry: &mut IdentityRegistry,
    ) -> Result<PathBuf, GenerationError> {
        let path = self.descriptor_path_for(unit);
        let text = self.render_unit(unit, registry)?;
        write_validated(&path, &text).inspect_err(|e| hint_unresolved(e, PROJECT_PLACEHOLDERS))?;
        debug!("Wrote {} for {}", path.display(), unit.name);
        Ok(path)
    }

    /// Render the descriptor text of `unit` without writing it.
    pub fn render_unit(
        &self,
        unit: &BuildUnit,
        registry: &mut IdentityRegistry,
    ) -> Result<String, GenerationError> {
        let mut codelets =
            Codelets::declare([PROJECT_REFERENCES, REFERENCES, COMPILE_FILES, RESOURCES]);

        for dep in self.map.project_dependencies(unit) {
            let mut vars = Substitutions::new();
            vars.insert("ProjectName", dep.effective_output_name())
                .insert("ProjectFile", descriptor_file_name(dep, &self.config.project_extension))
                .insert("ProjectGuid", registry.resolve(&dep.name));
            codelets.append(PROJECT_REFERENCES, &render(&self.templates.project_reference, &vars));
        }

        for reference in self.map.external_references(unit) {
            let mut vars = Substitutions::new();
            vars.insert("Reference", reference).insert("HintPath", self.hint_path(reference));
            codelets.append(REFERENCES, &render(&self.templates.reference, &vars));
        }

        self.append_sources(unit, &mut codelets)?;

        let mut vars = Substitutions::new();
        vars.insert("ProjectGuid", registry.resolve(&unit.name))
            .insert("OutputType", unit.output_type.as_str())
            .insert("Namespace", unit.name.as_str())
            .insert("AssemblyName", unit.effective_output_name())
            .insert("FrameworkVersion", self.config.framework_version.as_str())
            .insert("OutputPath", descriptor_path(Path::new(&self.config.output_path)));
        codelets.apply_to(&mut vars);

        Ok(render(&self.templates.project, &vars))
    }

    fn append_sources(&self, unit: &BuildUnit, codelets: &mut Codelets) -> Result<(), GenerationError> {
        let source_dir = self.mapping.source_dir_for(&self.config.source_root, &unit.name);
        let options = SourceOptions {
            source_extension: &self.config.source_extension,
            resource_extension: &self.config.resource_extension,
            companion_suffixes: &self.config.companion_suffixes,
            assembly_info: self.config.assembly_info.as_deref(),
        };

        for entry in sources::collect(&source_dir, &options)? {
            let mut vars = Substitutions::new();
            vars.insert("Filename", descriptor_path(&relative_path(&self.output_dir, &entry.path)))
                .insert("DependentUpon", entry.dependent_upon.clone().unwrap_or_default());

            match (entry.kind, &entry.dependent_upon) {
                (SourceKind::Compile, None) => {
                    codelets.append(COMPILE_FILES, &render(&self.templates.compile, &vars));
                }
                (SourceKind::Compile, Some(_)) => {
                    codelets
                        .append(COMPILE_FILES, &render(&self.templates.compile_dependent, &vars));
                }
                (SourceKind::Resource, _) => match &self.templates.resource {
                    Some(template) => codelets.append(RESOURCES, &render(template, &vars)),
                    None => trace!("No resource template, skipping {}", entry.path.display()),
                },
            }
        }
        Ok(())
    }

    /// Relative path to `<reference>.dll` in the first library directory that
    /// has it, else the bare file name.
    fn hint_path(&self, reference: &str) -> String {
        let file_name = format!("{reference}.dll");
        self.config
            .library_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
            .map(|found| descriptor_path(&relative_path(&self.output_dir, &found)))
            .unwrap_or(file_name)
    }
}
