//! Text templating for generated descriptors.
//!
//! - [`cache`] - read-through template file cache
//! - [`renderer`] - `${placeholder}` substitution, codelets and validation
//! - [`set`] - the named template files of one target environment

pub mod cache;
pub mod renderer;
pub mod set;

pub use cache::TemplateCache;
pub use renderer::{Codelets, Substitutions, find_unresolved, render, suggest_similar};
pub use set::TemplateSet;
