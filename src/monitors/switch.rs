//! File-switch monitor: records focus moving to a different file.

use std::path::{Path, PathBuf};

use super::RecordContext;
use crate::models::LogEntry;

/// Identity-debounced focus tracker.
///
/// Focusing the file that is already the last recorded one is discarded;
/// there is no time window.
#[derive(Debug)]
pub struct SwitchMonitor {
    ctx: RecordContext,
    last_active_file: Option<PathBuf>,
}

impl SwitchMonitor {
    pub fn new(ctx: RecordContext) -> Self {
        Self {
            ctx,
            last_active_file: None,
        }
    }

    /// Seed the slot with the focus that existed at startup, without logging.
    pub fn prime(&mut self, current: Option<&Path>) {
        self.last_active_file = current.map(Path::to_path_buf);
    }

    pub fn last_active_file(&self) -> Option<&Path> {
        self.last_active_file.as_deref()
    }

    /// Handle a focus change. Returns whether a switch record was written.
    pub fn on_focus_changed(&mut self, document: Option<&Path>) -> bool {
        let Some(current) = document else {
            return false;
        };
        if self.last_active_file.as_deref() == Some(current) {
            tracing::trace!(path = %current.display(), "focus unchanged, skipping");
            return false;
        }

        self.last_active_file = Some(current.to_path_buf());
        self.ctx.log.record(&LogEntry::Switched {
            actor: self.ctx.actor.clone(),
            path: current.to_path_buf(),
            at: self.ctx.clock.now(),
        });
        true
    }
}
