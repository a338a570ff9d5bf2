//! Wires host notifications to the monitors.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::notify::{Level, Notifier};
use super::protocol::HostEvent;
use crate::config::Config;
use crate::fs::activity_log::ActivityLog;
use crate::monitors::{EditMonitor, RecordContext, SwitchMonitor};
use crate::session::SessionLogger;
use crate::supervisor::{ExecutionSupervisor, SaveDecision};

/// Message shown when the user asks for a log that has not been written yet.
pub const NO_LOG_YET: &str = "Log file does not exist yet. Start editing to create it.";

/// Whether the dispatch loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Active,
    Ended,
}

/// The host's editor state plus one instance of every monitor.
pub struct Host {
    active_document: Option<PathBuf>,
    switch: SwitchMonitor,
    edit: EditMonitor,
    supervisor: ExecutionSupervisor,
    session: SessionLogger,
    log: Arc<ActivityLog>,
    notifier: Arc<dyn Notifier>,
    lifecycle: Lifecycle,
}

impl Host {
    pub fn new(ctx: RecordContext, config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            active_document: None,
            switch: SwitchMonitor::new(ctx.clone()),
            edit: EditMonitor::with_interval(ctx.clone(), config.edit_interval()),
            supervisor: ExecutionSupervisor::new(
                ctx.clone(),
                config.runner_table(),
                config.supervisor(),
            ),
            session: SessionLogger::new(ctx.log.clone(), ctx.clock.clone()),
            log: ctx.log,
            notifier,
            lifecycle: Lifecycle::Created,
        }
    }

    pub fn supervisor(&mut self) -> &mut ExecutionSupervisor {
        &mut self.supervisor
    }

    pub fn active_document(&self) -> Option<&Path> {
        self.active_document.as_deref()
    }

    /// Start the session. `initial_focus` is whatever document already had
    /// focus; it seeds the switch monitor without producing a record.
    pub fn activate(&mut self, initial_focus: Option<&Path>) {
        if self.lifecycle != Lifecycle::Created {
            tracing::warn!("activate called twice, ignoring");
            return;
        }
        self.lifecycle = Lifecycle::Active;
        self.active_document = initial_focus.map(Path::to_path_buf);
        self.session.on_activate();
        self.switch.prime(initial_focus);
    }

    /// Route one event. Events outside an active session are dropped.
    pub fn dispatch(&mut self, event: HostEvent) -> Control {
        if self.lifecycle != Lifecycle::Active {
            tracing::debug!(event = event.name(), "no active session, dropping event");
            return if self.lifecycle == Lifecycle::Ended {
                Control::Shutdown
            } else {
                Control::Continue
            };
        }
        tracing::trace!(event = event.name(), "dispatching");

        match event {
            HostEvent::FocusChanged { path } => {
                self.active_document = path.clone();
                self.switch.on_focus_changed(path.as_deref());
            }
            HostEvent::DocumentChanged { path, changes } => {
                self.edit
                    .on_document_changed(&self.active_document, &path, changes);
            }
            HostEvent::DocumentSaved { path } => {
                if let SaveDecision::Started(handle) = self.supervisor.on_save(&path) {
                    tracing::debug!(path = %handle.path().display(), "run admitted");
                }
            }
            HostEvent::DebugSessionStarted => {
                self.supervisor.debug_mode().mark_started();
            }
            HostEvent::OpenLog => self.open_log(),
            HostEvent::Shutdown => return Control::Shutdown,
        }
        Control::Continue
    }

    /// Decode and route one protocol line. Malformed lines are skipped.
    pub fn handle_line(&mut self, line: &str) -> Control {
        if line.trim().is_empty() {
            return Control::Continue;
        }
        match HostEvent::parse(line) {
            Ok(event) => self.dispatch(event),
            Err(e) => {
                tracing::warn!(error = %e, line, "skipping malformed host event");
                Control::Continue
            }
        }
    }

    /// "Open the activity log": point the host at the file, or say there is
    /// nothing yet.
    pub fn open_log(&self) {
        if self.log.exists() {
            self.notifier
                .notify(Level::Info, "Opening activity log", Some(self.log.path()));
        } else {
            self.notifier.info(NO_LOG_YET);
        }
    }

    /// End the session. Waits for in-flight runs so their records land
    /// before the end record.
    pub fn deactivate(&mut self) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.lifecycle = Lifecycle::Ended;
        self.supervisor.drain();
        self.session.on_deactivate();
    }
}
