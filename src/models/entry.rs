//! Activity log records and their exact on-disk line formats.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

use super::run::{RunMode, RunOutcome};
use crate::clock::format_timestamp;

/// Separator written after every session-end record.
pub const SESSION_SEPARATOR: &str = "==================================================";

/// A single record appended to the activity log.
///
/// `Display` renders the full record including its trailing newline(s), so a
/// record is appended with exactly one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    SessionStarted {
        at: DateTime<Local>,
    },
    SessionEnded {
        at: DateTime<Local>,
    },
    Switched {
        actor: String,
        path: PathBuf,
        at: DateTime<Local>,
    },
    Edited {
        actor: String,
        path: PathBuf,
        at: DateTime<Local>,
    },
    Ran {
        actor: String,
        path: PathBuf,
        mode: RunMode,
        outcome: RunOutcome,
        at: DateTime<Local>,
    },
}

impl LogEntry {
    /// Short name of the record kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LogEntry::SessionStarted { .. } => "session-start",
            LogEntry::SessionEnded { .. } => "session-end",
            LogEntry::Switched { .. } => "switch",
            LogEntry::Edited { .. } => "edit",
            LogEntry::Ran { .. } => "run",
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::SessionStarted { at } => {
                writeln!(f, "Session started at:{}", format_timestamp(at))
            }
            LogEntry::SessionEnded { at } => {
                write!(
                    f,
                    "\nSession ended at:{}\n\n{SESSION_SEPARATOR}\n\n",
                    format_timestamp(at)
                )
            }
            LogEntry::Switched { actor, path, at } => writeln!(
                f,
                "{actor} has switched into the following file: {}, at this time: {}",
                path.display(),
                format_timestamp(at)
            ),
            LogEntry::Edited { actor, path, at } => writeln!(
                f,
                "{actor} has edited the file {}, at this time: {}",
                path.display(),
                format_timestamp(at)
            ),
            LogEntry::Ran {
                actor,
                path,
                mode,
                outcome,
                at,
            } => writeln!(
                f,
                "{actor} ran file: {} in {mode} mode with result: {outcome} at {}",
                path.display(),
                format_timestamp(at)
            ),
        }
    }
}
