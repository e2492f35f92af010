use predicates::prelude::*;

use crate::common::TestWorkspace;

#[test]
fn test_order_text() {
    let ws = TestWorkspace::new();
    ws.projgen()
        .arg("order")
        .assert()
        .success()
        .stdout("Ict.Common\nIct.Common.IO\nIct.Petra.Client\n");
}

#[test]
fn test_order_prefers_libraries() {
    let ws = TestWorkspace::new();
    ws.write_map("App,Exe\nZLib,Library\nTool,WinExe\n  ZLib\n");
    ws.projgen().arg("order").assert().success().stdout("ZLib\nApp\nTool\n");
}

#[test]
fn test_order_json() {
    let ws = TestWorkspace::new();
    let output = ws.projgen().args(["order", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2]["name"], "Ict.Petra.Client");
    assert_eq!(entries[2]["output_type"], "WinExe");
    assert_eq!(entries[2]["output_name"], "PetraClient");
}

#[test]
fn test_order_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("projgen").unwrap();
    cmd.args(["order", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"));
}
