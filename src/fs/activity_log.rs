//! The append-only activity log file.
//!
//! Every record goes through [`ActivityLog::append`], which holds an
//! in-process mutex and an `fs2` exclusive advisory lock for the duration of
//! one write, so records from the dispatch thread and from finished runs
//! never interleave.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::host::notify::{Notifier, NullNotifier};
use crate::models::LogEntry;

/// File name of the activity log inside the documents directory.
pub const LOG_FILE_NAME: &str = "Activity-Session-Log.txt";

/// Default log location: `<documents>/Activity-Session-Log.txt`.
///
/// Falls back to `<home>/Documents` on platforms where no documents
/// directory is registered.
pub fn default_log_path() -> Result<PathBuf> {
    let documents = dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .ok_or(Error::NoLogLocation)?;
    Ok(documents.join(LOG_FILE_NAME))
}

pub struct ActivityLog {
    path: PathBuf,
    write_lock: Mutex<()>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_notifier(path, Arc::new(NullNotifier))
    }

    /// Create a sink that also reports write failures to the host.
    pub fn with_notifier(path: impl Into<PathBuf>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            notifier,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append one record, creating parent directories on demand.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let line = entry.to_string();
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        file.lock_exclusive()
            .map_err(|e| Error::io(&self.path, e))?;
        let written = file
            .write_all(line.as_bytes())
            .and_then(|()| file.flush());
        let _ = FileExt::unlock(&file);
        written.map_err(|e| Error::io(&self.path, e))
    }

    /// Append one record, swallowing failures.
    ///
    /// Failures go to the diagnostic channel and, when a host is attached, to
    /// the user as a non-fatal notification. Returns whether the write
    /// succeeded. There are no retries.
    pub fn record(&self, entry: &LogEntry) -> bool {
        match self.append(entry) {
            Ok(()) => {
                tracing::debug!(kind = entry.kind(), "appended activity record");
                true
            }
            Err(e) => {
                tracing::error!(kind = entry.kind(), error = %e, "failed to write activity log");
                self.notifier
                    .error(&format!("Failed to write to log file: {e}"));
                false
            }
        }
    }

    /// Read the whole log under a shared lock.
    ///
    /// Returns `Ok(None)` when no log has been written yet.
    pub fn read(&self) -> Result<Option<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        file.lock_shared().map_err(|e| Error::io(&self.path, e))?;
        let mut content = String::new();
        let read = BufReader::new(&file).read_to_string(&mut content);
        let _ = FileExt::unlock(&file);
        read.map_err(|e| Error::io(&self.path, e))?;
        Ok(Some(content))
    }
}
