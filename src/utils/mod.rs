//! Shared utilities.
//!
//! - [`fs`] - atomic writes, directory creation and lexical path helpers

pub mod fs;

pub use fs::{atomic_write, descriptor_path, ensure_dir, normalize_path, relative_path};
