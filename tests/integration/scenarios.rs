//! End-to-end scenarios through the host adapter

use super::helpers::{switch_line, test_host, test_host_with, test_config, ACTOR};
use session_logger::config::Config;
use session_logger::host::{Control, HostEvent};
use session_logger::supervisor::RunnerSpec;
use std::path::{Path, PathBuf};

fn focus(path: &Path) -> HostEvent {
    HostEvent::FocusChanged {
        path: Some(path.to_path_buf()),
    }
}

fn edit(path: &Path) -> HostEvent {
    HostEvent::DocumentChanged {
        path: path.to_path_buf(),
        changes: 1,
    }
}

fn save(path: &Path) -> HostEvent {
    HostEvent::DocumentSaved {
        path: path.to_path_buf(),
    }
}

#[test]
fn test_switch_a_b_a_then_a_a() {
    let mut t = test_host();
    let a = PathBuf::from("/work/a.py");
    let b = PathBuf::from("/work/b.py");

    t.host.activate(Some(&a));
    t.host.dispatch(focus(&b));
    t.clock.advance_ms(500);
    t.host.dispatch(focus(&a));
    t.host.dispatch(focus(&a));
    t.host.dispatch(focus(&a));

    assert_eq!(
        t.lines(),
        vec![
            "Session started at:2025/01/15 09:30:00".to_string(),
            switch_line(&b, "2025/01/15 09:30:00"),
            switch_line(&a, "2025/01/15 09:30:00"),
        ]
    );
}

#[test]
fn test_edit_heartbeat_over_a_minute() {
    let mut t = test_host();
    let a = PathBuf::from("/work/a.rs");
    t.host.activate(Some(&a));

    // One edit per second for a minute: windows open at 0, 10, ..., 50.
    for _ in 0..60 {
        t.host.dispatch(edit(&a));
        t.clock.advance_ms(1_000);
    }

    let edits: Vec<_> = t
        .lines()
        .into_iter()
        .filter(|l| l.contains("has edited the file"))
        .collect();
    assert_eq!(edits.len(), 6);
    assert_eq!(
        edits[1],
        format!("{ACTOR} has edited the file /work/a.rs, at this time: 2025/01/15 09:30:10")
    );
}

#[test]
fn test_edits_to_unfocused_documents_are_ignored() {
    let mut t = test_host();
    t.host.activate(Some(Path::new("/work/a.rs")));
    t.host.dispatch(edit(Path::new("/work/b.rs")));
    t.host.dispatch(HostEvent::DocumentChanged {
        path: PathBuf::from("/work/a.rs"),
        changes: 0,
    });
    assert_eq!(t.lines().len(), 1);
}

#[test]
fn test_edits_after_focus_lost_are_ignored() {
    let mut t = test_host();
    let a = PathBuf::from("/work/a.rs");
    t.host.activate(Some(&a));

    t.host.dispatch(HostEvent::FocusChanged { path: None });
    t.host.dispatch(edit(&a));
    assert_eq!(t.lines().len(), 1);

    // Refocusing the same file is not a switch, and edits count again.
    t.host.dispatch(focus(&a));
    t.host.dispatch(edit(&a));
    assert_eq!(
        t.lines()[1..],
        [format!("{ACTOR} has edited the file /work/a.rs, at this time: 2025/01/15 09:30:00")]
    );
}

#[cfg(unix)]
#[test]
fn test_save_twice_two_seconds_apart_runs_once() {
    let mut t = test_host();
    let foo = t.script("foo.sh", "echo hi\n");
    t.host.activate(Some(&foo));

    t.host.dispatch(save(&foo));
    t.clock.advance_ms(2_000);
    t.host.dispatch(save(&foo));
    t.host.deactivate();

    let runs: Vec<_> = t
        .lines()
        .into_iter()
        .filter(|l| l.contains(" ran file: "))
        .collect();
    assert_eq!(runs.len(), 1);
    assert!(runs[0].starts_with(&format!(
        "{ACTOR} ran file: {} in normal mode with result: success at ",
        foo.display()
    )));
}

#[cfg(unix)]
#[test]
fn test_debug_session_marks_later_runs() {
    let mut t = test_host();
    let ok = t.script("ok.sh", "exit 0\n");
    let bad = t.script("bad.sh", "exit 1\n");
    t.host.activate(None);

    t.host.dispatch(save(&ok));
    t.host.supervisor().drain();
    t.host.dispatch(HostEvent::DebugSessionStarted);
    t.host.dispatch(save(&bad));
    t.host.deactivate();

    let runs: Vec<_> = t
        .lines()
        .into_iter()
        .filter(|l| l.contains(" ran file: "))
        .collect();
    assert_eq!(runs.len(), 2);
    assert!(runs[0].contains("in normal mode with result: success"));
    assert!(runs[1].contains("in debug mode with result: error"));
}

#[test]
fn test_missing_interpreter_is_one_error_line() {
    let config = Config {
        runners: vec![RunnerSpec::new(
            &["py"],
            "python-not-installed-anywhere",
            &["{file}"],
        )],
        ..Config::default()
    };
    let mut t = test_host_with(config);
    let missing = t.temp.path().join("missing.py");
    t.host.activate(None);

    assert_eq!(t.host.dispatch(save(&missing)), Control::Continue);
    t.host.deactivate();

    let runs: Vec<_> = t
        .lines()
        .into_iter()
        .filter(|l| l.contains(" ran file: "))
        .collect();
    assert_eq!(runs.len(), 1);
    assert!(runs[0].contains("missing.py in normal mode with result: error at "));
}

#[cfg(unix)]
#[test]
fn test_timeout_is_error_and_session_still_ends() {
    let config = Config {
        run_timeout_ms: 300,
        ..test_config()
    };
    let mut t = test_host_with(config);
    let slow = t.script("slow.sh", "sleep 30\n");
    t.host.activate(None);

    let started = std::time::Instant::now();
    t.host.dispatch(save(&slow));
    t.host.deactivate();
    assert!(started.elapsed() < std::time::Duration::from_secs(10));

    let lines = t.lines();
    let run = lines.iter().position(|l| l.contains(" ran file: ")).unwrap();
    let end = lines
        .iter()
        .position(|l| l.starts_with("Session ended at:"))
        .unwrap();
    assert!(lines[run].contains("with result: error"));
    assert!(run < end, "run record must precede the session end");
}

#[cfg(unix)]
#[test]
fn test_dispatch_is_not_blocked_by_running_file() {
    let mut t = test_host();
    let slow = t.script("slow.sh", "sleep 1\n");
    let other = PathBuf::from("/work/other.rs");
    t.host.activate(None);

    t.host.dispatch(save(&slow));
    t.host.dispatch(focus(&other));

    // The switch is recorded while the run is still going.
    let lines = t.lines();
    assert_eq!(lines.last().unwrap(), &switch_line(&other, "2025/01/15 09:30:00"));
    assert!(!lines.iter().any(|l| l.contains(" ran file: ")));

    t.host.deactivate();
    assert!(t.lines().iter().any(|l| l.contains(" ran file: ")));
}

#[test]
fn test_unsupported_save_writes_nothing() {
    let mut t = test_host();
    t.host.activate(None);
    t.host.dispatch(save(Path::new("/work/README.md")));
    t.host.dispatch(save(Path::new("/work/Dockerfile")));
    assert_eq!(t.lines().len(), 1);
}
