//! Test fixtures for dependency maps, template sets and whole workspaces.

use std::fs;
use std::path::Path;

use crate::config::{CONFIG_FILE_NAME, GeneratorConfig};
use crate::templating::set;

/// Sample dependency map text
#[derive(Clone, Debug)]
pub struct DependencyMapFixture {
    pub name: String,
    pub content: String,
}

impl DependencyMapFixture {
    /// Three units in a chain, the executable with an output name override
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: "\
# generated by the build
Ict.Common,Library
  System.Xml
Ict.Common.IO,Library
  Ict.Common
  ICSharpCode.SharpZipLib
Ict.Petra.Client,WinExe,PetraClient
  Ict.Common.IO
  Ict.Common
"
            .to_string(),
        }
    }

    /// A direct two-unit cycle plus a unit blocked by it
    pub fn cyclic() -> Self {
        Self {
            name: "cyclic".to_string(),
            content: "A,Library\n  B\nB,Library\n  A\nC,Exe\n  A\n".to_string(),
        }
    }

    /// Write the map to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, &self.content).unwrap();
    }
}

/// Write a complete template set, optional templates included, into `dir`.
pub fn write_template_set(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    let files = [
        (
            set::PROJECT,
            "<Project Guid=\"{${ProjectGuid}}\" Type=\"${OutputType}\">\n\
             <RootNamespace>${Namespace}</RootNamespace>\n\
             <AssemblyName>${AssemblyName}</AssemblyName>\n\
             <TargetFrameworkVersion>${FrameworkVersion}</TargetFrameworkVersion>\n\
             <OutputPath>${OutputPath}</OutputPath>\n\
             ${ProjectReferences}${References}${CompileFiles}${Resources}</Project>\n",
        ),
        (
            set::PROJECT_REFERENCE,
            "  <ProjectReference Include=\"${ProjectFile}\" Name=\"${ProjectName}\" Project=\"{${ProjectGuid}}\" />\n",
        ),
        (set::REFERENCE, "  <Reference Include=\"${Reference}\" HintPath=\"${HintPath}\" />\n"),
        (set::COMPILE, "  <Compile Include=\"${Filename}\" />\n"),
        (
            set::COMPILE_DEPENDENT,
            "  <Compile Include=\"${Filename}\" DependentUpon=\"${DependentUpon}\" />\n",
        ),
        (
            set::RESOURCE,
            "  <EmbeddedResource Include=\"${Filename}\" DependentUpon=\"${DependentUpon}\" />\n",
        ),
        (set::SOLUTION, "# ${SolutionName}\n${Projects}${Folders}Global\n${ProjectConfigurations}EndGlobal\n"),
        (
            set::SOLUTION_PROJECT,
            "Project(\"${ProjectName}\", \"${ProjectFile}\", \"{${ProjectGuid}}\")\nEndProject\n",
        ),
        (set::SOLUTION_CONFIG, "  {${ProjectGuid}}.Debug.Build = Debug\n"),
        (set::SOLUTION_FOLDER, "Folder(\"${FolderName}\", \"{${FolderGuid}}\")\n${FolderItems}EndFolder\n"),
        (set::SOLUTION_FOLDER_ITEM, "  ${Filename}\n"),
    ];

    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

const SAMPLE_CONFIG: &str = r#"dependency_map = "dependencies.txt"
registry = "project_guids.txt"
template_dir = "templates"
output_dir = "generated"
source_root = "src"
"#;

/// Lay out a runnable workspace below `base`.
///
/// Writes [`DependencyMapFixture::basic`], the default environment's
/// templates, a few source files and a `projgen.toml` using the same
/// conventional paths as [`GeneratorConfig::with_base`], which is returned.
pub fn write_sample_workspace(base: &Path) -> GeneratorConfig {
    let config = GeneratorConfig::with_base(base);

    DependencyMapFixture::basic().write_to(&config.dependency_map);
    write_template_set(&config.environment_template_dir());

    let common = config.source_root.join("Ict/Common");
    let client = config.source_root.join("Ict/Petra/Client");
    fs::create_dir_all(&common).unwrap();
    fs::create_dir_all(&client).unwrap();
    fs::write(common.join("StringHelper.cs"), "").unwrap();
    fs::write(client.join("MainWindow.cs"), "").unwrap();
    fs::write(client.join("MainWindow.Designer.cs"), "").unwrap();
    fs::write(client.join("MainWindow.resx"), "").unwrap();

    fs::write(base.join(CONFIG_FILE_NAME), SAMPLE_CONFIG).unwrap();
    config
}
