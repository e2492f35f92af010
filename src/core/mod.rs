//! Core types for projgen
//!
//! - [`BuildUnit`] and [`OutputType`] describe the entries of the dependency map
//! - [`GenerationError`] is the typed failure value returned by every component
//! - [`ErrorContext`] and [`user_friendly_error`] turn failures into CLI output

pub mod error;
pub mod unit;

pub use error::{ErrorContext, GenerationError, user_friendly_error};
pub use unit::{BuildUnit, OutputType};
