//! `${placeholder}` substitution and fragment composition.
//!
//! Rendering is literal string replacement. Placeholders without a value are
//! left untouched so an inner render can leave work for an outer one; the
//! final output is checked with [`find_unresolved`] before it is written.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use strsim::levenshtein;

/// Maximum Levenshtein distance, as a percentage of the name length, for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}\s]*)\}").expect("placeholder regex is valid"));

/// Placeholder name → replacement value.
#[derive(Debug, Default, Clone)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing an earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

/// Named accumulating buffers.
///
/// Per-item fragments (one per compile file, per reference, ...) are rendered
/// independently and appended to a codelet; the parent template then consumes
/// the whole buffer as one substitution value.
#[derive(Debug, Default, Clone)]
pub struct Codelets {
    buffers: BTreeMap<String, String>,
}

impl Codelets {
    /// Create empty buffers for `names`, so an empty section still resolves.
    pub fn declare<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            buffers: names.into_iter().map(|n| (n.to_string(), String::new())).collect(),
        }
    }

    /// Append a rendered fragment to the buffer `name`, creating it if needed.
    pub fn append(&mut self, name: &str, fragment: &str) {
        self.buffers.entry(name.to_string()).or_default().push_str(fragment);
    }

    /// Copy every buffer into `vars` under its own name.
    pub fn apply_to(&self, vars: &mut Substitutions) {
        for (name, text) in &self.buffers {
            vars.insert(name.clone(), text.clone());
        }
    }
}

/// Replace every `${name}` in `template` that has a value in `vars`.
pub fn render(template: &str, vars: &Substitutions) -> String {
    let mut output = template.to_string();
    for (name, value) in &vars.values {
        let token = format!("${{{name}}}");
        if output.contains(&token) {
            output = output.replace(&token, value);
        }
    }
    output
}

/// Names of all placeholders still present in `text`, deduplicated in order of appearance.
pub fn find_unresolved(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for capture in PLACEHOLDER.captures_iter(text) {
        let name = &capture[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Up to three names from `available` that are close to `target`.
pub fn suggest_similar<'a>(target: &str, available: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut scored: Vec<(&str, usize)> =
        available.into_iter().map(|name| (name, levenshtein(target, name))).collect();
    scored.sort_by_key(|(_, distance)| *distance);

    scored
        .into_iter()
        .filter(|(_, distance)| *distance <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(name, _)| name.to_string())
        .collect()
}
