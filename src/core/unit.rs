//! Build unit types.
//!
//! A [`BuildUnit`] is one compilable module in the dependency map. Units are
//! loaded once at startup and stay immutable for the rest of the run.

use serde::Serialize;
use std::fmt;

/// Kind of artifact a unit produces.
///
/// The three well-known kinds parse case-insensitively. Any other spelling is
/// kept verbatim so templates still receive exactly what the map declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum OutputType {
    /// Class library
    Library,
    /// Console executable
    Exe,
    /// Windowed executable
    WinExe,
    /// Anything else found in the map
    Other(String),
}

impl OutputType {
    /// Libraries are placed ahead of executables when both are eligible.
    #[must_use]
    pub const fn is_library(&self) -> bool {
        matches!(self, Self::Library)
    }

    /// Canonical spelling used when rendering templates.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Library => "Library",
            Self::Exe => "Exe",
            Self::WinExe => "WinExe",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for OutputType {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "library" => Self::Library,
            "exe" => Self::Exe,
            "winexe" => Self::WinExe,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OutputType> for String {
    fn from(value: OutputType) -> Self {
        value.as_str().to_string()
    }
}

/// A named build target from the dependency map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildUnit {
    /// Unique unit name, e.g. `Ict.Common.IO`
    pub name: String,
    /// Artifact kind
    pub output_type: OutputType,
    /// Artifact name when it differs from `name`
    pub output_name_override: Option<String>,
    /// Referenced names in declaration order. Names that do not resolve to
    /// another unit are external references.
    pub references: Vec<String>,
}

impl BuildUnit {
    /// Create a unit without references.
    pub fn new(name: impl Into<String>, output_type: OutputType) -> Self {
        Self {
            name: name.into(),
            output_type,
            output_name_override: None,
            references: Vec::new(),
        }
    }

    /// Name of the emitted artifact: the override if present, else the unit name.
    #[must_use]
    pub fn effective_output_name(&self) -> &str {
        self.output_name_override.as_deref().unwrap_or(&self.name)
    }
}
