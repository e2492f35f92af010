use predicates::prelude::*;
use projgen::registry::IdentityRegistry;
use std::fs;

use crate::common::TestWorkspace;

#[test]
fn test_generate_writes_every_descriptor() {
    let ws = TestWorkspace::new();

    ws.projgen()
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generation complete!"))
        .stdout(predicate::str::contains("3 projects"));

    for file in ["Ict.Common.csproj", "Ict.Common.IO.csproj", "PetraClient.csproj"] {
        let text = ws.read_output(file);
        assert!(!text.contains("${"), "{file} has unresolved placeholders");
    }
    assert!(!ws.output_dir().join("Ict.Petra.Client.csproj").exists());
    assert!(ws.read_output("Ict.Common.csproj").contains(r#"Include="..\..\src\Ict\Common\StringHelper.cs""#));

    let registry = IdentityRegistry::load(&ws.config.registry).unwrap();
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_project_references_point_at_canonical_ids() {
    let ws = TestWorkspace::new();
    ws.projgen().arg("generate").assert().success();

    let registry = IdentityRegistry::load(&ws.config.registry).unwrap();
    let common_id = registry.get("Ict.Common").unwrap();
    let io_id = registry.get("Ict.Common.IO").unwrap();

    let client = ws.read_output("PetraClient.csproj");
    assert!(client.contains(&format!("Include=\"Ict.Common.IO.csproj\" Name=\"Ict.Common.IO\" Project=\"{{{io_id}}}\"")));
    assert!(client.contains(&format!("Project=\"{{{common_id}}}\"")));
    assert!(client.contains("<AssemblyName>PetraClient</AssemblyName>"));
    assert!(client.contains("<RootNamespace>Ict.Petra.Client</RootNamespace>"));
    assert!(client.contains(r#"MainWindow.Designer.cs" DependentUpon="MainWindow.cs""#));
    assert!(client.contains("EmbeddedResource"));

    let io = ws.read_output("Ict.Common.IO.csproj");
    assert!(io.contains(r#"<Reference Include="ICSharpCode.SharpZipLib" HintPath="ICSharpCode.SharpZipLib.dll" />"#));
}

#[test]
fn test_ids_are_stable_across_runs() {
    let ws = TestWorkspace::new();

    ws.projgen().arg("generate").assert().success();
    let first = ws.read_output("Ict.Common.csproj");
    let ids_before = IdentityRegistry::load(&ws.config.registry).unwrap();

    ws.projgen()
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("new ids").not());
    assert_eq!(ws.read_output("Ict.Common.csproj"), first);

    let ids_after = IdentityRegistry::load(&ws.config.registry).unwrap();
    for name in ["Ict.Common", "Ict.Common.IO", "Ict.Petra.Client"] {
        assert_eq!(ids_before.get(name), ids_after.get(name));
    }
}

#[test]
fn test_solution_lists_selected_units_in_build_order() {
    let ws = TestWorkspace::new();

    ws.projgen()
        .args(["generate", "--solution", "Client=PetraClient.csproj,Ict.Common"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 solutions"));

    let sln = ws.read_output("Client.sln");
    let common = sln.find("\"Ict.Common.csproj\"").unwrap();
    let io = sln.find("\"Ict.Common.IO.csproj\"").unwrap();
    let client = sln.find("\"PetraClient.csproj\"").unwrap();
    assert!(common < io && io < client);
    assert!(!sln.contains("Ict.Petra.Client.csproj"));
}

#[test]
fn test_configured_solution_with_folder() {
    let ws = TestWorkspace::new();
    let db = ws.root().join("db");
    fs::create_dir_all(db.join("patches")).unwrap();
    fs::write(db.join("petra.yml"), "").unwrap();
    fs::write(db.join("patches/001.sql"), "").unwrap();
    ws.append_config(
        r#"
[[solutions]]
name = "OpenPetra.Server"
include = "Ict.Common"
folders = ["Database"]

[[folders]]
name = "Database"
path = "db"
pattern = "**/*"
"#,
    );

    ws.projgen().arg("generate").assert().success();

    let sln = ws.read_output("OpenPetra.Server.sln");
    assert!(sln.starts_with("# OpenPetra.Server\n"));
    assert!(sln.contains("Folder(\"Database\""));
    assert!(sln.contains(r"..\..\db\petra.yml"));
    assert!(sln.contains(r"..\..\db\patches\001.sql"));
    assert!(!sln.contains("PetraClient"));

    let registry = IdentityRegistry::load(&ws.config.registry).unwrap();
    assert!(registry.get("folder:Database").is_some());
}

#[test]
fn test_environment_and_output_overrides() {
    let ws = TestWorkspace::new();
    let templates = ws.config.template_dir.clone();
    fs::create_dir_all(templates.join("vs2019")).unwrap();
    for entry in fs::read_dir(templates.join("default")).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), templates.join("vs2019").join(entry.file_name())).unwrap();
    }

    ws.projgen()
        .args(["generate", "--environment", "vs2019", "--output", "build"])
        .assert()
        .success();

    assert!(ws.root().join("build/vs2019/PetraClient.csproj").exists());
    assert!(!ws.output_dir().exists());

    let common = fs::read_to_string(ws.root().join("build/vs2019/Ict.Common.csproj")).unwrap();
    assert!(common.contains(r#"<Compile Include="..\..\src\Ict\Common\StringHelper.cs" />"#));
}

#[test]
fn test_quiet_suppresses_summary() {
    let ws = TestWorkspace::new();
    ws.projgen().args(["-q", "generate"]).assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_check_reports_without_writing() {
    let ws = TestWorkspace::new();

    ws.projgen()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 units, 3 project references"))
        .stdout(predicate::str::contains("no cycles"));

    assert!(!ws.config.output_dir.exists());
    assert!(!ws.config.registry.exists());
}
