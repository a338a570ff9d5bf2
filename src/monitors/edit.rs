//! Edit monitor: a rate-limited heartbeat of editing activity.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::RecordContext;
use crate::debounce::DebounceTracker;
use crate::models::LogEntry;

/// Minimum spacing between two edit records.
pub const DEFAULT_EDIT_INTERVAL: Duration = Duration::from_secs(10);

/// The host's view of which document has focus.
///
/// The edit monitor asks the host directly instead of reading the switch
/// monitor's slot, so the two monitors can be driven in any order.
pub trait ActiveDocument {
    fn active_document(&self) -> Option<PathBuf>;
}

impl ActiveDocument for Option<PathBuf> {
    fn active_document(&self) -> Option<PathBuf> {
        self.clone()
    }
}

#[derive(Debug)]
pub struct EditMonitor {
    ctx: RecordContext,
    // One global key: edits to any file share a single window.
    last_edit: DebounceTracker<()>,
}

impl EditMonitor {
    pub fn new(ctx: RecordContext) -> Self {
        Self::with_interval(ctx, DEFAULT_EDIT_INTERVAL)
    }

    pub fn with_interval(ctx: RecordContext, interval: Duration) -> Self {
        Self {
            ctx,
            last_edit: DebounceTracker::new(interval),
        }
    }

    /// Handle a document mutation. Returns whether an edit record was written.
    ///
    /// Ignored when the document is not the focused one or the change list
    /// is empty.
    pub fn on_document_changed(
        &mut self,
        host: &impl ActiveDocument,
        document: &Path,
        content_changes: usize,
    ) -> bool {
        if content_changes == 0 {
            return false;
        }
        if host.active_document().as_deref() != Some(document) {
            tracing::trace!(path = %document.display(), "edit outside focused document");
            return false;
        }

        let now = self.ctx.clock.now();
        if !self.last_edit.try_accept((), now) {
            return false;
        }

        self.ctx.log.record(&LogEntry::Edited {
            actor: self.ctx.actor.clone(),
            path: document.to_path_buf(),
            at: now,
        });
        true
    }
}
