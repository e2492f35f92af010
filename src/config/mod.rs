//! Generator configuration (`projgen.toml`).
//!
//! Every path in the file is relative to the directory that contains it.
//!
//! ```toml
//! dependency_map = "build/dependencies.txt"
//! registry = "build/project_guids.txt"
//! template_dir = "templates"
//! environment = "vs2019"
//! output_dir = "generated"
//! source_root = "src"
//! framework_version = "v4.7.2"
//! assembly_info = "src/CommonAssemblyInfo.cs"
//! library_dirs = ["lib"]
//!
//! [[path_mapping]]
//! pattern = "Ict.Petra."
//! replacement = "Petra."
//!
//! [[solutions]]
//! name = "OpenPetra.Server"
//! include = "Ict.Common,Ict.Petra.Server"
//! folders = ["Definitions"]
//!
//! [[folders]]
//! name = "Definitions"
//! path = "db"
//! pattern = "*.yml"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::GenerationError;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "projgen.toml";

fn default_environment() -> String {
    "default".to_string()
}

fn default_framework_version() -> String {
    "v4.7.2".to_string()
}

fn default_project_extension() -> String {
    "csproj".to_string()
}

fn default_solution_extension() -> String {
    "sln".to_string()
}

fn default_source_extension() -> String {
    "cs".to_string()
}

fn default_resource_extension() -> String {
    "resx".to_string()
}

fn default_companion_suffixes() -> Vec<String> {
    vec![".Designer.cs".to_string(), ".ManualCode.cs".to_string()]
}

fn default_output_path() -> String {
    "bin".to_string()
}

/// One literal substring replacement applied to unit names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMappingEntry {
    pub pattern: String,
    pub replacement: String,
}

/// One aggregate descriptor to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionConfig {
    /// Aggregate file name without extension
    pub name: String,
    /// Comma-separated selection patterns
    pub include: String,
    /// Names of [`FolderConfig`] groupings to add
    #[serde(default)]
    pub folders: Vec<String>,
}

/// A non-unit folder grouping whose members come from a directory scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    pub name: String,
    /// Directory to scan, relative to the config file
    pub path: PathBuf,
    /// Glob matched against paths relative to `path`
    #[serde(default = "default_folder_pattern")]
    pub pattern: String,
}

fn default_folder_pattern() -> String {
    "*".to_string()
}

/// Everything the generator needs to know about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub dependency_map: PathBuf,
    pub registry: PathBuf,
    pub template_dir: PathBuf,
    /// Subdirectory of `template_dir` (and of `output_dir`) for the target environment
    #[serde(default = "default_environment")]
    pub environment: String,
    pub output_dir: PathBuf,
    pub source_root: PathBuf,

    #[serde(default = "default_framework_version")]
    pub framework_version: String,
    #[serde(default = "default_project_extension")]
    pub project_extension: String,
    #[serde(default = "default_solution_extension")]
    pub solution_extension: String,
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    #[serde(default = "default_resource_extension")]
    pub resource_extension: String,
    /// Suffixes of files nested under `<stem>.<source_extension>`
    #[serde(default = "default_companion_suffixes")]
    pub companion_suffixes: Vec<String>,
    /// Shared assembly info file, always the first compile entry
    #[serde(default)]
    pub assembly_info: Option<PathBuf>,
    /// Directories searched for external libraries (`<name>.dll`)
    #[serde(default)]
    pub library_dirs: Vec<PathBuf>,
    /// Build output directory, relative to each descriptor
    #[serde(default = "default_output_path")]
    pub output_path: String,

    #[serde(default)]
    pub path_mapping: Vec<PathMappingEntry>,
    #[serde(default)]
    pub solutions: Vec<SolutionConfig>,
    #[serde(default)]
    pub folders: Vec<FolderConfig>,
}

impl GeneratorConfig {
    /// Minimal configuration rooted at `base`, with conventional file names.
    pub fn with_base(base: &Path) -> Self {
        Self {
            dependency_map: base.join("dependencies.txt"),
            registry: base.join("project_guids.txt"),
            template_dir: base.join("templates"),
            environment: default_environment(),
            output_dir: base.join("generated"),
            source_root: base.join("src"),
            framework_version: default_framework_version(),
            project_extension: default_project_extension(),
            solution_extension: default_solution_extension(),
            source_extension: default_source_extension(),
            resource_extension: default_resource_extension(),
            companion_suffixes: default_companion_suffixes(),
            assembly_info: None,
            library_dirs: Vec::new(),
            output_path: default_output_path(),
            path_mapping: Vec::new(),
            solutions: Vec::new(),
            folders: Vec::new(),
        }
    }

    /// Read `path` and resolve every relative path against its directory.
    ///
    /// The directory is made absolute first, so every resolved path has a root
    /// and descriptor-relative paths can always be computed.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidConfig`] if the file is missing, is not valid
    /// TOML, or a solution names an unknown folder.
    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let invalid = |reason: String| GenerationError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        if !path.exists() {
            return Err(invalid("file not found".to_string()));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| GenerationError::io("read configuration", path, e))?;
        let mut config: Self = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let base = std::path::absolute(parent)
            .map_err(|e| GenerationError::io("resolve configuration directory", parent, e))?;
        config.resolve_paths(&base);
        config.validate().map_err(invalid)?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        join(&mut self.dependency_map);
        join(&mut self.registry);
        join(&mut self.template_dir);
        join(&mut self.output_dir);
        join(&mut self.source_root);
        if let Some(info) = self.assembly_info.as_mut() {
            join(info);
        }
        self.library_dirs.iter_mut().for_each(join);
        for folder in &mut self.folders {
            join(&mut folder.path);
        }
    }

    fn validate(&self) -> Result<(), String> {
        for folder in &self.folders {
            if let Err(e) = glob::Pattern::new(&folder.pattern) {
                return Err(format!("folder '{}' has an invalid pattern: {e}", folder.name));
            }
        }
        for solution in &self.solutions {
            for folder in &solution.folders {
                if self.folder(folder).is_none() {
                    return Err(format!(
                        "solution '{}' uses undefined folder '{}'",
                        solution.name, folder
                    ));
                }
            }
        }
        Ok(())
    }

    /// Template directory of the selected environment.
    pub fn environment_template_dir(&self) -> PathBuf {
        self.template_dir.join(&self.environment)
    }

    /// Output directory of the selected environment.
    pub fn environment_output_dir(&self) -> PathBuf {
        self.output_dir.join(&self.environment)
    }

    pub fn folder(&self, name: &str) -> Option<&FolderConfig> {
        self.folders.iter().find(|f| f.name == name)
    }
}
