//! Extension to runner command table.
//!
//! The table is data: a default set of interpreters and compilers lives here,
//! and `[[runners]]` entries in the config file replace or extend it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ExecutionRequest;

/// Placeholder for the saved file's name.
pub const FILE_PLACEHOLDER: &str = "{file}";
/// Placeholder for the saved file's name without extension.
pub const STEM_PLACEHOLDER: &str = "{stem}";
/// Placeholder for the saved file's directory.
pub const DIR_PLACEHOLDER: &str = "{dir}";

/// How to run files with a given set of extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerSpec {
    /// Extensions without the leading dot, matched case-insensitively
    pub extensions: Vec<String>,
    pub program: String,
    /// Argument templates; see the placeholder constants
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_args() -> Vec<String> {
    vec![FILE_PLACEHOLDER.to_string()]
}

impl RunnerSpec {
    pub fn new(extensions: &[&str], program: &str, args: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// A fully resolved program and argument list for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl std::fmt::Display for RunnerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The built-in runners.
pub fn default_runners() -> Vec<RunnerSpec> {
    vec![
        RunnerSpec::new(&["py"], "python", &["{file}"]),
        RunnerSpec::new(&["js"], "node", &["{file}"]),
        RunnerSpec::new(&["ts"], "ts-node", &["{file}"]),
        RunnerSpec::new(&["java"], "javac", &["{file}"]),
        RunnerSpec::new(&["cpp", "cc", "cxx"], "g++", &["{file}", "-o", "{stem}.exe"]),
        RunnerSpec::new(&["c"], "gcc", &["{file}", "-o", "{stem}.exe"]),
        RunnerSpec::new(&["go"], "go", &["run", "{file}"]),
        RunnerSpec::new(&["rs"], "rustc", &["{file}"]),
        RunnerSpec::new(&["rb"], "ruby", &["{file}"]),
        RunnerSpec::new(&["php"], "php", &["{file}"]),
        RunnerSpec::new(&["pl"], "perl", &["{file}"]),
    ]
}

/// Lookup table from lower-cased extension to runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerTable {
    by_extension: BTreeMap<String, RunnerSpec>,
}

impl Default for RunnerTable {
    fn default() -> Self {
        Self::from_specs(default_runners())
    }
}

impl RunnerTable {
    /// Build a table; later specs win for extensions claimed twice.
    pub fn from_specs(specs: impl IntoIterator<Item = RunnerSpec>) -> Self {
        let mut table = Self {
            by_extension: BTreeMap::new(),
        };
        table.extend(specs);
        table
    }

    /// Add runners, replacing any existing entry for the same extensions.
    pub fn extend(&mut self, specs: impl IntoIterator<Item = RunnerSpec>) {
        for spec in specs {
            for ext in &spec.extensions {
                let key = normalize_extension(ext);
                if key.is_empty() {
                    continue;
                }
                self.by_extension.insert(key, spec.clone());
            }
        }
    }

    pub fn is_supported(&self, extension: &str) -> bool {
        self.by_extension
            .contains_key(&normalize_extension(extension))
    }

    pub fn get(&self, extension: &str) -> Option<&RunnerSpec> {
        self.by_extension.get(&normalize_extension(extension))
    }

    /// Resolve the command for a request, or `None` if unsupported.
    pub fn resolve(&self, request: &ExecutionRequest) -> Option<RunnerCommand> {
        let spec = self.get(&request.extension)?;
        let file = request.file_name();
        let stem = request.file_stem();
        let dir = request.working_directory.to_string_lossy();
        let values = [
            (FILE_PLACEHOLDER, file.as_str()),
            (STEM_PLACEHOLDER, stem.as_str()),
            (DIR_PLACEHOLDER, &*dir),
        ];
        let args = spec
            .args
            .iter()
            .map(|arg| expand_placeholders(arg, &values))
            .collect();
        Some(RunnerCommand {
            program: spec.program.clone(),
            args,
        })
    }

    /// Iterate `(extension, spec)` pairs in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RunnerSpec)> {
        self.by_extension.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn len(&self) -> usize {
        self.by_extension.len()
    }
}

/// Expand placeholders left to right. Substituted text is never rescanned,
/// so a file literally named `{stem}.py` stays intact.
fn expand_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while !rest.is_empty() {
        match values.iter().find(|(key, _)| rest.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &rest[key.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
    }
    out
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
