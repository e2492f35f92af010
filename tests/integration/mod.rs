//! Integration test suite for projgen
//!
//! End-to-end tests that drive the `projgen` binary against sample
//! workspaces laid out in temporary directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **generate**: full generation pass, registry stability, solutions and folders
//! - **order**: build order output in text and JSON
//! - **errors**: fatal conditions and their user-facing messages

#[path = "../common/mod.rs"]
mod common;

mod errors;
mod generate;
mod order;
