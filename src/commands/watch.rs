//! `session-logger watch`: drive the monitors from host events on stdin.

use anyhow::{Context, Result};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::fs::activity_log::ActivityLog;
use crate::host::{Control, Host, JsonLinesNotifier, Notifier};
use crate::monitors::{resolve_actor, RecordContext};

enum Inbound {
    Line(String),
    Closed,
    Interrupted,
}

/// Run a session until stdin closes, a `shutdown` event arrives, or the
/// process is interrupted. All three end the session cleanly.
pub fn execute(config: &Config, initial_focus: Option<PathBuf>) -> Result<()> {
    let log_path = config.log_path().context("Failed to resolve activity log path")?;
    let notifier: Arc<dyn Notifier> = Arc::new(JsonLinesNotifier::new(io::stdout()));
    let log = Arc::new(ActivityLog::with_notifier(log_path, notifier.clone()));
    let ctx = RecordContext::new(
        log,
        Arc::new(SystemClock),
        resolve_actor(config.actor.as_deref()),
    );
    let mut host = Host::new(ctx, config, notifier);

    let (tx, rx) = mpsc::channel();

    let interrupt_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(Inbound::Interrupted);
    }) {
        tracing::warn!(error = %e, "could not install interrupt handler");
    }

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Inbound::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to read host events");
                    break;
                }
            }
        }
        let _ = tx.send(Inbound::Closed);
    });

    host.activate(initial_focus.as_deref());

    for message in rx {
        match message {
            Inbound::Line(line) => {
                if host.handle_line(&line) == Control::Shutdown {
                    tracing::debug!("host requested shutdown");
                    break;
                }
            }
            Inbound::Closed => {
                tracing::debug!("host event stream closed");
                break;
            }
            Inbound::Interrupted => {
                tracing::info!("interrupted, ending session");
                break;
            }
        }
    }

    host.deactivate();
    Ok(())
}
