//! Test utilities for projgen
//!
//! Helpers shared by unit tests and the integration suite (through the
//! `test-utils` feature): logging setup and on-disk fixtures for dependency
//! maps, template sets and complete workspaces.
//!
//! # Example
//!
//! ```rust,no_run
//! use projgen::emitter::Generator;
//! use projgen::test_utils::write_sample_workspace;
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let config = write_sample_workspace(temp.path());
//! let report = Generator::new(config).run().unwrap();
//! assert_eq!(report.projects.len(), 3);
//! ```

pub mod fixtures;

pub use fixtures::{DependencyMapFixture, write_sample_workspace, write_template_set};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. `level` wins over `RUST_LOG`; with
/// neither, logging stays off.
///
/// To enable logging in tests via environment variable:
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
