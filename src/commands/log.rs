//! `session-logger open` and `session-logger path`.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;
use crate::fs::activity_log::ActivityLog;
use crate::host::NO_LOG_YET;

/// Print the activity log read-only, or say that none exists yet.
pub fn open(config: &Config) -> Result<()> {
    let log = ActivityLog::new(config.log_path().context("Failed to resolve activity log path")?);
    match log
        .read()
        .with_context(|| format!("Failed to read {}", log.path().display()))?
    {
        Some(content) => print!("{content}"),
        None => println!("{}", NO_LOG_YET.yellow()),
    }
    Ok(())
}

/// Print where the activity log lives.
pub fn path(config: &Config) -> Result<()> {
    let path = config.log_path().context("Failed to resolve activity log path")?;
    println!("{}", path.display());
    Ok(())
}
