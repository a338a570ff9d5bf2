//! User-facing notifications sent back to the host.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// One outbound notification line.
#[derive(Debug, Clone, Serialize)]
pub struct Notification<'a> {
    pub level: Level,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a Path>,
}

/// Channel for messages the user should see.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str, path: Option<&Path>);

    fn info(&self, message: &str) {
        self.notify(Level::Info, message, None);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message, None);
    }
}

/// Discards everything. Used when no host surface is attached.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _level: Level, _message: &str, _path: Option<&Path>) {}
}

/// Writes notifications as JSON lines to a writer (stdout under `watch`).
pub struct JsonLinesNotifier<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> Notifier for JsonLinesNotifier<W> {
    fn notify(&self, level: Level, message: &str, path: Option<&Path>) {
        let note = Notification {
            level,
            message,
            path,
        };
        let line = match serde_json::to_string(&note) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode notification");
                return;
            }
        };
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to deliver notification to host");
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<(Level, String)> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str, _path: Option<&Path>) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((level, message.to_string()));
    }
}
