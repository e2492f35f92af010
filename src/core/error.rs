//! Error handling for projgen
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`GenerationError`]) returned by every library
//!    operation, so callers and tests can inspect the failure data directly
//! 2. **User-friendly messages** ([`ErrorContext`]) built at the CLI boundary
//!    with details and an actionable suggestion
//!
//! Every fatal condition is a hard stop. The generator is a one-shot build
//! step: the recovery action is always "fix the input and re-run".
//!
//! # Examples
//!
//! ```rust,no_run
//! use projgen::core::{GenerationError, user_friendly_error};
//! use std::path::PathBuf;
//!
//! let error = GenerationError::MissingDependencyMap {
//!     path: PathBuf::from("build/dependencies.txt"),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored error, details and suggestion on stderr
//! ```

use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for every generation operation.
///
/// Variants carry structured data (paths, unit names, cycle edges) rather than
/// pre-formatted strings so that orchestration code can act on them.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The dependency map file does not exist.
    #[error("Dependency map not found: {}", .path.display())]
    MissingDependencyMap {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The dependency map exists but a line could not be interpreted.
    #[error("Malformed dependency map {}:{line}: {reason}", .path.display())]
    MalformedDependencyMap {
        /// Map file path
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// The project-to-project edges contain at least one cycle.
    ///
    /// `core` holds every unit of the cyclic core; `edges` maps each of them to
    /// the dependencies that are also in the core.
    #[error("{}", format_cycle(.core, .edges))]
    CyclicDependency {
        /// Units that are part of the cycle, sorted
        core: Vec<String>,
        /// In-core dependency edges per core unit
        edges: BTreeMap<String, Vec<String>>,
    },

    /// A rendered descriptor still contains `${...}` tokens.
    #[error(
        "Unresolved placeholders {} in generated file {}",
        format_placeholders(.placeholders),
        .file.display()
    )]
    UnresolvedPlaceholder {
        /// Where the invalid output was moved aside to
        file: PathBuf,
        /// Placeholder names left in the output
        placeholders: Vec<String>,
    },

    /// A required template file is missing.
    #[error("Template not found: {}", .path.display())]
    MissingTemplate {
        /// Expected template path
        path: PathBuf,
    },

    /// The generator configuration is missing or invalid.
    #[error("Invalid configuration {}: {reason}", .path.display())]
    InvalidConfig {
        /// Configuration file path
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// File system failure.
    #[error("Failed to {operation} {}: {source}", .path.display())]
    Io {
        /// Short verb phrase, e.g. "read template"
        operation: String,
        /// Path involved in the operation
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// Shorthand for wrapping an [`std::io::Error`] with its operation and path.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }
}

fn format_placeholders(placeholders: &[String]) -> String {
    placeholders.iter().map(|p| format!("${{{p}}}")).collect::<Vec<_>>().join(", ")
}

fn format_cycle(core: &[String], edges: &BTreeMap<String, Vec<String>>) -> String {
    let mut message = format!(
        "Circular dependency between {} project(s): {}",
        core.len(),
        core.join(", ")
    );
    for (unit, deps) in edges {
        for dep in deps {
            message.push_str(&format!("\n  {unit} -> {dep}"));
        }
    }
    message
}

/// Error wrapper carrying user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// Main error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with only the main message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// [`GenerationError`] variants get tailored suggestions; anything else is
/// shown with its full `anyhow` context chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(gen_error) = error.downcast_ref::<GenerationError>() {
        return create_error_context(gen_error);
    }

    let permission_denied = error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied);
    if permission_denied {
        return ErrorContext::new(format!("{error:#}"))
            .with_suggestion("Check file ownership and permissions of the output directory");
    }

    ErrorContext::new(format!("{error:#}"))
}

fn create_error_context(error: &GenerationError) -> ErrorContext {
    match error {
        GenerationError::MissingDependencyMap { .. } => ErrorContext::new(error.to_string())
            .with_details("Nothing can be generated without the build-unit dependency map")
            .with_suggestion(
                "Re-run the build step that produces the dependency map, then run projgen again",
            ),
        GenerationError::MalformedDependencyMap { .. } => ErrorContext::new(error.to_string())
            .with_details(
                "Headers are 'name,outputType[,outputName]'; reference lines are indented",
            )
            .with_suggestion("Fix the reported line or regenerate the dependency map"),
        GenerationError::CyclicDependency { .. } => ErrorContext::new(error.to_string())
            .with_details("Every edge listed above is part of the cycle")
            .with_suggestion("Remove one of the listed references to break the cycle"),
        GenerationError::UnresolvedPlaceholder { file, .. } => {
            ErrorContext::new(error.to_string())
                .with_details(format!("The invalid output was kept at {}", file.display()))
                .with_suggestion(
                    "A template references a placeholder the generator does not supply; fix the template set",
                )
        }
        GenerationError::MissingTemplate { .. } => ErrorContext::new(error.to_string())
            .with_suggestion("Check the template directory and the selected environment"),
        GenerationError::InvalidConfig { .. } => ErrorContext::new(error.to_string())
            .with_suggestion("Check projgen.toml or pass --config with the right path"),
        GenerationError::Io { .. } => ErrorContext::new(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_every_edge() {
        let mut edges = BTreeMap::new();
        edges.insert("A".to_string(), vec!["B".to_string()]);
        edges.insert("B".to_string(), vec!["A".to_string()]);
        let error = GenerationError::CyclicDependency {
            core: vec!["A".to_string(), "B".to_string()],
            edges,
        };

        let msg = error.to_string();
        assert!(msg.contains("2 project(s): A, B"));
        assert!(msg.contains("A -> B"));
        assert!(msg.contains("B -> A"));
    }

    #[test]
    fn test_unresolved_placeholder_message() {
        let error = GenerationError::UnresolvedPlaceholder {
            file: PathBuf::from("out/Foo.csproj.error"),
            placeholders: vec!["ProjectGuid".to_string()],
        };
        let msg = error.to_string();
        assert!(msg.contains("${ProjectGuid}"));
        assert!(msg.contains("Foo.csproj.error"));
    }

    #[test]
    fn test_user_friendly_error_suggests_rerun_for_missing_map() {
        let error = GenerationError::MissingDependencyMap {
            path: PathBuf::from("deps.txt"),
        };
        let ctx = user_friendly_error(anyhow::Error::from(error));
        assert!(ctx.message.contains("deps.txt"));
        assert!(ctx.suggestion.unwrap().contains("Re-run"));
    }

    #[test]
    fn test_user_friendly_error_keeps_context_chain() {
        let error = anyhow::anyhow!("inner").context("outer");
        let ctx = user_friendly_error(error);
        assert_eq!(ctx.message, "outer: inner");
        assert!(ctx.suggestion.is_none());
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("boom").with_details("why").with_suggestion("fix");
        assert_eq!(ctx.to_string(), "boom\nDetails: why\nSuggestion: fix");
    }
}
