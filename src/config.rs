//! User configuration loaded from TOML.
//!
//! Lookup order: an explicit `--config` path, then
//! `<config_dir>/session-logger/config.toml`, then built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::fs::activity_log::default_log_path;
use crate::monitors::DEFAULT_EDIT_INTERVAL;
use crate::supervisor::{
    RunnerSpec, RunnerTable, SupervisorConfig, DEFAULT_RUN_INTERVAL, DEFAULT_RUN_TIMEOUT,
};

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "session-logger";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name records are attributed to; defaults to the login name
    pub actor: Option<String>,
    /// Log file location; defaults to the documents directory
    pub log_path: Option<PathBuf>,
    pub edit_interval_ms: u64,
    pub run_interval_ms: u64,
    pub run_timeout_ms: u64,
    /// Runners layered over the built-in table
    pub runners: Vec<RunnerSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actor: None,
            log_path: None,
            edit_interval_ms: DEFAULT_EDIT_INTERVAL.as_millis() as u64,
            run_interval_ms: DEFAULT_RUN_INTERVAL.as_millis() as u64,
            run_timeout_ms: DEFAULT_RUN_TIMEOUT.as_millis() as u64,
            runners: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicitly given path must exist and parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.run_timeout_ms == 0 {
            return Err(Error::Config("run_timeout_ms must be positive".to_string()));
        }
        for spec in &self.runners {
            if spec.program.trim().is_empty() {
                return Err(Error::Config(format!(
                    "runner for {:?} has an empty program",
                    spec.extensions
                )));
            }
            if spec.extensions.is_empty() {
                return Err(Error::Config(format!(
                    "runner `{}` lists no extensions",
                    spec.program
                )));
            }
        }
        Ok(())
    }

    /// Resolved log path: configured, else the platform default.
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_path {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }

    pub fn edit_interval(&self) -> Duration {
        Duration::from_millis(self.edit_interval_ms)
    }

    pub fn supervisor(&self) -> SupervisorConfig {
        SupervisorConfig {
            min_interval: Duration::from_millis(self.run_interval_ms),
            timeout: Duration::from_millis(self.run_timeout_ms),
        }
    }

    /// Built-in runners with the configured ones layered on top.
    pub fn runner_table(&self) -> RunnerTable {
        let mut table = RunnerTable::default();
        table.extend(self.runners.iter().cloned());
        table
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
