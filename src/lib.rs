//! projgen - project and solution descriptor generator
//!
//! Reads a line-oriented dependency map of build units and writes one project
//! descriptor per unit plus ordered, filtered solution descriptors, all
//! rendered from `${placeholder}` text templates.
//!
//! # Architecture Overview
//!
//! - `dependencies.txt` lists every build unit, its output type and its
//!   references (produced by an earlier build step)
//! - `project_guids.txt` keeps the GUID of every unit stable across runs
//! - the template directory holds one fixed template set per target
//!   environment
//! - `projgen.toml` ties these together and declares the solutions to emit
//!
//! # Core Modules
//!
//! - [`core`] - Build unit types and error handling
//! - [`graph`] - Dependency map loading and the build-order sequencer
//! - [`registry`] - Persistent unit name → GUID registry
//! - [`templating`] - Template cache, `${}` substitution and codelets
//! - [`emitter`] - Project and solution emission and the generation pass
//! - [`pattern`] - Unit selection patterns and glob directory scans
//! - [`config`] - `projgen.toml` loading
//! - [`cli`] - Command-line interface
//! - [`utils`] - File system helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use projgen::config::GeneratorConfig;
//! use projgen::emitter::Generator;
//! use std::path::Path;
//!
//! let config = GeneratorConfig::load(Path::new("projgen.toml"))?;
//! let report = Generator::new(config).run()?;
//! println!("{} projects written", report.projects.len());
//! # Ok::<(), projgen::core::GenerationError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod emitter;
pub mod graph;
pub mod pattern;
pub mod registry;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
