//! Types describing one supervised run of a saved file.

use std::fmt;
use std::path::{Path, PathBuf};

/// Output reported when a run exceeds its time budget.
pub const TIMEOUT_OUTPUT: &str = "Execution timeout";

/// A request to run a saved file, derived from a save notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub file_path: PathBuf,
    /// Lower-cased extension without the leading dot
    pub extension: String,
    pub working_directory: PathBuf,
}

impl ExecutionRequest {
    /// Build a request for `path`.
    ///
    /// Returns `None` when the path has no extension. Whether the extension is
    /// runnable is decided by the runner table, not here.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        let working_directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Some(Self {
            file_path: path.to_path_buf(),
            extension,
            working_directory,
        })
    }

    /// File name component passed to the runner.
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// File name with its extension removed.
    pub fn file_stem(&self) -> String {
        self.file_path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Result of one supervised process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub succeeded: bool,
    pub output: String,
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    /// Classify a process that exited on its own.
    ///
    /// Stderr is appended under a `STDERR:` label when non-empty. When both
    /// streams are empty the output names the exit code instead.
    pub fn from_exit(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        let mut output = stdout;
        if !stderr.is_empty() {
            output.push_str("\nSTDERR:\n");
            output.push_str(&stderr);
        }
        if output.is_empty() {
            output = match exit_code {
                Some(code) => format!("Process exited with code {code}"),
                None => "Process exited with code null".to_string(),
            };
        }
        Self {
            succeeded: exit_code == Some(0),
            output,
            exit_code,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            succeeded: false,
            output: TIMEOUT_OUTPUT.to_string(),
            exit_code: None,
        }
    }

    pub fn spawn_failed(message: impl fmt::Display) -> Self {
        Self {
            succeeded: false,
            output: format!("Execution error: {message}"),
            exit_code: None,
        }
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.succeeded {
            RunOutcome::Success
        } else {
            RunOutcome::Error
        }
    }

    pub fn is_timeout(&self) -> bool {
        !self.succeeded && self.exit_code.is_none() && self.output == TIMEOUT_OUTPUT
    }
}

/// Whether a debug session had been observed when a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Debug,
    Normal,
}

impl RunMode {
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            RunMode::Debug
        } else {
            RunMode::Normal
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Debug => write!(f, "debug"),
            RunMode::Normal => write!(f, "normal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Error,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => write!(f, "success"),
            RunOutcome::Error => write!(f, "error"),
        }
    }
}
