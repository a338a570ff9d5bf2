//! Execution supervisor: run-on-save with admission control.
//!
//! A save is admitted when its extension has a runner and the per-path
//! debounce passes. Admission happens on the dispatch thread and stamps the
//! path immediately, so a second save of a file that is still running is
//! rejected like any other save inside the window. The run itself happens on
//! a worker thread; the worker writes the outcome record when the process
//! resolves.

pub mod executor;
pub mod runners;

pub use executor::{execute, DEFAULT_RUN_TIMEOUT};
pub use runners::{RunnerCommand, RunnerSpec, RunnerTable};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::debounce::DebounceTracker;
use crate::models::{ExecutionRequest, ExecutionResult, LogEntry, RunMode};
use crate::monitors::RecordContext;

/// Minimum spacing between two runs of the same file.
pub const DEFAULT_RUN_INTERVAL: Duration = Duration::from_secs(5);

/// Sticky "a debug session has been seen" flag.
///
/// Set by the first debug-session-start notification and never cleared for
/// the life of the process.
#[derive(Debug, Clone, Default)]
pub struct DebugMode(Arc<AtomicBool>);

impl DebugMode {
    pub fn mark_started(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn current(&self) -> RunMode {
        RunMode::from_debug_flag(self.0.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub min_interval: Duration,
    pub timeout: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_RUN_INTERVAL,
            timeout: DEFAULT_RUN_TIMEOUT,
        }
    }
}

/// What happened to a save notification.
#[derive(Debug)]
pub enum SaveDecision {
    /// No runner for this extension
    Unsupported,
    /// Same file ran too recently
    Debounced,
    /// A run was started on a worker thread
    Started(RunHandle),
}

impl SaveDecision {
    pub fn is_started(&self) -> bool {
        matches!(self, SaveDecision::Started(_))
    }

    pub fn into_handle(self) -> Option<RunHandle> {
        match self {
            SaveDecision::Started(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Completion signal for one admitted run.
#[derive(Debug)]
pub struct RunHandle {
    path: PathBuf,
    done: mpsc::Receiver<ExecutionResult>,
}

impl RunHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the run resolves. The outcome record is already written
    /// when this returns.
    pub fn wait(self) -> Option<ExecutionResult> {
        self.done.recv().ok()
    }
}

pub struct ExecutionSupervisor {
    ctx: RecordContext,
    runners: Arc<RunnerTable>,
    config: SupervisorConfig,
    last_run: DebounceTracker<PathBuf>,
    debug_mode: DebugMode,
    in_flight: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for ExecutionSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionSupervisor")
            .field("config", &self.config)
            .field("runners", &self.runners.len())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl ExecutionSupervisor {
    pub fn new(ctx: RecordContext, runners: RunnerTable, config: SupervisorConfig) -> Self {
        Self {
            last_run: DebounceTracker::new(config.min_interval),
            ctx,
            runners: Arc::new(runners),
            config,
            debug_mode: DebugMode::default(),
            in_flight: Vec::new(),
        }
    }

    pub fn debug_mode(&self) -> &DebugMode {
        &self.debug_mode
    }

    /// Number of runs that have not resolved yet.
    pub fn in_flight(&mut self) -> usize {
        self.in_flight.retain(|h| !h.is_finished());
        self.in_flight.len()
    }

    /// Handle a save notification. Never blocks on the run itself.
    pub fn on_save(&mut self, path: &Path) -> SaveDecision {
        let Some(request) = ExecutionRequest::from_path(path) else {
            return SaveDecision::Unsupported;
        };
        let Some(command) = self.runners.resolve(&request) else {
            tracing::trace!(path = %path.display(), "no runner for extension");
            return SaveDecision::Unsupported;
        };

        let accepted_at = self.ctx.clock.now();
        if !self.last_run.try_accept(request.file_path.clone(), accepted_at) {
            tracing::debug!(path = %path.display(), "save inside run window, skipping");
            return SaveDecision::Debounced;
        }

        tracing::info!(path = %path.display(), command = %command, "running saved file");
        self.in_flight.retain(|h| !h.is_finished());

        let (tx, rx) = mpsc::channel();
        let ctx = self.ctx.clone();
        let debug_mode = self.debug_mode.clone();
        let timeout = self.config.timeout;
        let worker = thread::spawn(move || {
            let result = execute(&request, &command, timeout);
            tracing::debug!(
                path = %request.file_path.display(),
                succeeded = result.succeeded,
                output = %result.output,
                "run resolved"
            );
            ctx.log.record(&LogEntry::Ran {
                actor: ctx.actor.clone(),
                path: request.file_path.clone(),
                mode: debug_mode.current(),
                outcome: result.outcome(),
                at: ctx.clock.now(),
            });
            let _ = tx.send(result);
        });
        self.in_flight.push(worker);

        SaveDecision::Started(RunHandle {
            path: path.to_path_buf(),
            done: rx,
        })
    }

    /// Wait for every in-flight run to resolve and write its record.
    ///
    /// Each run is bounded by the timeout, so this returns within one
    /// timeout of the last admitted save.
    pub fn drain(&mut self) {
        for worker in self.in_flight.drain(..) {
            if worker.join().is_err() {
                tracing::error!("run worker panicked");
            }
        }
    }
}
