//! Activity monitors driven by host notifications.
//!
//! Each monitor owns its own state and exposes one handler. They share only
//! the [`RecordContext`], i.e. the log sink, the clock and the actor name.

pub mod edit;
pub mod switch;

pub use edit::{ActiveDocument, EditMonitor, DEFAULT_EDIT_INTERVAL};
pub use switch::SwitchMonitor;

use std::sync::Arc;

use crate::clock::Clock;
use crate::fs::activity_log::ActivityLog;

/// What every record writer needs.
#[derive(Clone)]
pub struct RecordContext {
    pub log: Arc<ActivityLog>,
    pub clock: Arc<dyn Clock>,
    pub actor: String,
}

impl RecordContext {
    pub fn new(log: Arc<ActivityLog>, clock: Arc<dyn Clock>, actor: impl Into<String>) -> Self {
        Self {
            log,
            clock,
            actor: actor.into(),
        }
    }
}

impl std::fmt::Debug for RecordContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordContext")
            .field("log", &self.log)
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

/// Resolve the name records are attributed to.
///
/// A configured name wins; otherwise the login name from the environment.
pub fn resolve_actor(configured: Option<&str>) -> String {
    if let Some(name) = configured.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
