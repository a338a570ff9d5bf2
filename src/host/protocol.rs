//! Newline-delimited JSON events sent by the editor host.
//!
//! ```text
//! {"event":"focus_changed","path":"/src/main.py"}
//! {"event":"focus_changed","path":null}
//! {"event":"document_changed","path":"/src/main.py","changes":1}
//! {"event":"document_saved","path":"/src/main.py"}
//! {"event":"debug_session_started"}
//! {"event":"open_log"}
//! {"event":"shutdown"}
//! ```

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Focus moved; `path` is absent when no document has focus
    FocusChanged {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    /// A document's content changed
    DocumentChanged {
        path: PathBuf,
        /// Number of content changes in the transaction
        changes: usize,
    },
    DocumentSaved {
        path: PathBuf,
    },
    DebugSessionStarted,
    /// The user asked to see the activity log
    OpenLog,
    /// The host is going away; end the session
    Shutdown,
}

impl HostEvent {
    /// Decode one protocol line.
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::FocusChanged { .. } => "focus_changed",
            HostEvent::DocumentChanged { .. } => "document_changed",
            HostEvent::DocumentSaved { .. } => "document_saved",
            HostEvent::DebugSessionStarted => "debug_session_started",
            HostEvent::OpenLog => "open_log",
            HostEvent::Shutdown => "shutdown",
        }
    }
}
