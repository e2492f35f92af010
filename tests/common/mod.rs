//! Common test utilities for projgen integration tests

// Not every helper is used by every test file
#![allow(dead_code)]

use assert_cmd::Command;
use projgen::config::GeneratorConfig;
use projgen::test_utils::{init_test_logging, write_sample_workspace};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A sample workspace on disk plus helpers to run the binary against it.
pub struct TestWorkspace {
    temp: TempDir,
    pub config: GeneratorConfig,
}

impl TestWorkspace {
    /// Workspace with the basic map, full template set and `projgen.toml`.
    pub fn new() -> Self {
        init_test_logging(None);
        let temp = TempDir::new().unwrap();
        let config = write_sample_workspace(temp.path());
        Self {
            temp,
            config,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("projgen.toml")
    }

    /// Append TOML to `projgen.toml`.
    pub fn append_config(&self, extra: &str) {
        let mut content = fs::read_to_string(self.config_path()).unwrap();
        content.push_str(extra);
        fs::write(self.config_path(), content).unwrap();
    }

    pub fn write_map(&self, content: &str) {
        fs::write(&self.config.dependency_map, content).unwrap();
    }

    /// Descriptor output directory of the default environment.
    pub fn output_dir(&self) -> PathBuf {
        self.config.environment_output_dir()
    }

    pub fn read_output(&self, file: &str) -> String {
        fs::read_to_string(self.output_dir().join(file)).unwrap()
    }

    /// `projgen` running inside the workspace root.
    pub fn projgen(&self) -> Command {
        let mut cmd = Command::cargo_bin("projgen").unwrap();
        cmd.current_dir(self.root()).env_remove("RUST_LOG");
        cmd
    }
}
