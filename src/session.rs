//! Session boundary records.

use std::sync::Arc;

use crate::clock::Clock;
use crate::fs::activity_log::ActivityLog;
use crate::models::LogEntry;

/// Writes the start record on activation and the end record on deactivation.
#[derive(Clone)]
pub struct SessionLogger {
    log: Arc<ActivityLog>,
    clock: Arc<dyn Clock>,
}

impl SessionLogger {
    pub fn new(log: Arc<ActivityLog>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// Record the session start. Not debounced.
    pub fn on_activate(&self) -> bool {
        tracing::info!(log = %self.log.path().display(), "session started");
        self.log.record(&LogEntry::SessionStarted {
            at: self.clock.now(),
        })
    }

    /// Record the session end and separator.
    ///
    /// Failures only reach the diagnostic channel; there is nothing left to
    /// notify at shutdown.
    pub fn on_deactivate(&self) -> bool {
        let entry = LogEntry::SessionEnded {
            at: self.clock.now(),
        };
        match self.log.append(&entry) {
            Ok(()) => {
                tracing::info!("session ended");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to write session end");
                false
            }
        }
    }
}
