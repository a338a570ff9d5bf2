//! Test helpers shared by the integration tests

use chrono::{Local, TimeZone};
use session_logger::clock::ManualClock;
use session_logger::config::Config;
use session_logger::fs::activity_log::ActivityLog;
use session_logger::host::{Host, NullNotifier};
use session_logger::monitors::RecordContext;
use session_logger::supervisor::RunnerSpec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const ACTOR: &str = "tester";

/// A host wired to a temp log and a manual clock.
///
/// `.sh` files run through `sh` so execution tests need no interpreters.
pub struct TestHost {
    pub temp: TempDir,
    pub log: Arc<ActivityLog>,
    pub clock: Arc<ManualClock>,
    pub host: Host,
}

pub fn test_config() -> Config {
    Config {
        runners: vec![RunnerSpec::new(&["sh"], "sh", &["{file}"])],
        ..Config::default()
    }
}

pub fn test_host() -> TestHost {
    test_host_with(test_config())
}

pub fn test_host_with(config: Config) -> TestHost {
    let temp = TempDir::new().expect("temp dir");
    let log = Arc::new(ActivityLog::new(temp.path().join("logs").join("activity.txt")));
    let clock = Arc::new(ManualClock::new(
        Local.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
    ));
    let ctx = RecordContext::new(log.clone(), clock.clone(), ACTOR);
    let host = Host::new(ctx, &config, Arc::new(NullNotifier));
    TestHost {
        temp,
        log,
        clock,
        host,
    }
}

impl TestHost {
    /// Write a script into the temp dir and return its path.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, body).expect("write script");
        path
    }

    pub fn lines(&self) -> Vec<String> {
        read_lines(&self.log)
    }
}

pub fn read_lines(log: &ActivityLog) -> Vec<String> {
    log.read()
        .expect("read log")
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

pub fn switch_line(path: &Path, at: &str) -> String {
    format!(
        "{ACTOR} has switched into the following file: {}, at this time: {at}",
        path.display()
    )
}
