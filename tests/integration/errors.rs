use predicates::prelude::*;
use projgen::test_utils::DependencyMapFixture;
use std::fs;

use crate::common::TestWorkspace;

#[test]
fn test_cycle_names_every_edge() {
    let ws = TestWorkspace::new();
    DependencyMapFixture::cyclic().write_to(&ws.config.dependency_map);

    ws.projgen()
        .arg("generate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Circular dependency between 2 project(s): A, B"))
        .stderr(predicate::str::contains("A -> B"))
        .stderr(predicate::str::contains("B -> A"))
        .stderr(predicate::str::contains("C -> A").not());

    assert!(!ws.config.registry.exists());
}

#[test]
fn test_missing_map() {
    let ws = TestWorkspace::new();
    fs::remove_file(&ws.config.dependency_map).unwrap();

    ws.projgen()
        .arg("order")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency map not found"))
        .stderr(predicate::str::contains("Re-run the build step"));
}

#[test]
fn test_missing_config() {
    let ws = TestWorkspace::new();
    ws.projgen()
        .args(["--config", "nowhere.toml", "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.toml"));
}

#[test]
fn test_unresolved_placeholder_leaves_error_file() {
    let ws = TestWorkspace::new();
    let template = ws.config.environment_template_dir().join("compile.template");
    fs::write(&template, "  <Compile Include=\"${FileName}\" />\n").unwrap();

    ws.projgen()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("${FileName}"))
        .stderr(predicate::str::contains(".csproj.error"));

    let error_files: Vec<_> = fs::read_dir(ws.output_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".error"))
        .collect();
    assert_eq!(error_files.len(), 1);
    assert!(!ws.config.registry.exists());
}

#[test]
fn test_missing_required_template() {
    let ws = TestWorkspace::new();
    fs::remove_file(ws.config.environment_template_dir().join("solution.template")).unwrap();

    ws.projgen()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found"))
        .stderr(predicate::str::contains("solution.template"));
}

#[test]
fn test_malformed_map_reports_line() {
    let ws = TestWorkspace::new();
    ws.write_map("  Orphan\n");

    ws.projgen()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependencies.txt:1"));
}
