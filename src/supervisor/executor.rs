//! Spawning and bounding a single runner process.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

use super::runners::RunnerCommand;
use crate::models::{ExecutionRequest, ExecutionResult};

/// Hard wall-clock budget for one run.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest wait for the pipe readers once the runner has exited.
///
/// Never extends past the run deadline.
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the readers get to report after the process group is killed.
const POST_KILL_GRACE: Duration = Duration::from_secs(1);

/// Maximum captured size per stream (10MB)
const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024;

/// Run `command` for `request`, capturing output and enforcing `timeout`.
///
/// Never fails: spawn errors, wait errors and timeouts all come back as a
/// failed [`ExecutionResult`]. On timeout the process (and on Unix its whole
/// process group) is killed and reaped exactly once, and partial output is
/// discarded.
pub fn execute(
    request: &ExecutionRequest,
    command: &RunnerCommand,
    timeout: Duration,
) -> ExecutionResult {
    let start = Instant::now();
    let deadline = start + timeout;

    let mut child = match spawn(request, command) {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(command = %command, error = %e, "failed to spawn runner");
            return ExecutionResult::spawn_failed(e);
        }
    };

    // Drain both pipes while waiting; a child that fills a pipe buffer would
    // otherwise block forever on write().
    let stdout_rx = drain_in_background(child.stdout.take(), "stdout");
    let stderr_rx = drain_in_background(child.stderr.take(), "stderr");

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let collect_until = Instant::now()
                + deadline
                    .saturating_duration_since(Instant::now())
                    .min(OUTPUT_COLLECTION_TIMEOUT);
            let (stdout, stderr) =
                collect_output(child.id(), &stdout_rx, &stderr_rx, collect_until);
            tracing::debug!(
                command = %command,
                exit_code = ?status.code(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "runner exited"
            );
            ExecutionResult::from_exit(status.code(), stdout, stderr)
        }
        Ok(None) => {
            terminate(&mut child);
            tracing::warn!(
                command = %command,
                timeout_ms = timeout.as_millis() as u64,
                "runner timed out and was killed"
            );
            ExecutionResult::timed_out()
        }
        Err(e) => {
            terminate(&mut child);
            tracing::warn!(command = %command, error = %e, "failed to wait for runner");
            ExecutionResult::spawn_failed(e)
        }
    }
}

fn spawn(request: &ExecutionRequest, command: &RunnerCommand) -> io::Result<Child> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .current_dir(&request.working_directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Own process group so a timeout can take down anything the runner forked.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    cmd.spawn()
}

fn drain_in_background<R: Read + Send + 'static>(
    stream: Option<R>,
    label: &'static str,
) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(stream) => {
            thread::spawn(move || {
                let _ = tx.send(read_capped(stream, label));
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

/// Gather both streams of an exited runner.
///
/// Something the runner left in its group can keep a pipe open after the
/// runner itself is gone. If a reader has not finished by `until`, the group
/// is killed, which closes the pipe and lets the reader return what it has.
fn collect_output(
    pgid: u32,
    stdout_rx: &mpsc::Receiver<String>,
    stderr_rx: &mpsc::Receiver<String>,
    until: Instant,
) -> (String, String) {
    let mut stdout = recv_until(stdout_rx, until);
    let mut stderr = recv_until(stderr_rx, until);

    if stdout.is_none() || stderr.is_none() {
        tracing::warn!(pgid, "runner left processes holding its output, killing group");
        kill_group(pgid);
        let grace = Instant::now() + POST_KILL_GRACE;
        if stdout.is_none() {
            stdout = recv_until(stdout_rx, grace);
        }
        if stderr.is_none() {
            stderr = recv_until(stderr_rx, grace);
        }
    }

    (stdout.unwrap_or_default(), stderr.unwrap_or_default())
}

fn recv_until(rx: &mpsc::Receiver<String>, until: Instant) -> Option<String> {
    rx.recv_timeout(until.saturating_duration_since(Instant::now()))
        .ok()
}

/// Read a stream to a string, keeping at most MAX_OUTPUT_SIZE bytes.
///
/// Anything past the cap is read and dropped so the child never blocks on a
/// full pipe.
fn read_capped<R: Read>(mut stream: R, label: &str) -> String {
    let mut buf = Vec::new();
    if let Err(e) = stream
        .by_ref()
        .take(MAX_OUTPUT_SIZE as u64)
        .read_to_end(&mut buf)
    {
        tracing::debug!(stream = label, error = %e, "runner output read failed");
    }
    let overflow = io::copy(&mut stream, &mut io::sink()).unwrap_or(0);

    let mut text = String::from_utf8_lossy(&buf).into_owned();
    if overflow > 0 {
        text.push_str(&format!("\n[{label} truncated at 10MB]"));
    }
    text
}

/// SIGKILL every process in the runner's group.
///
/// The group id is the runner's pid; the group outlives the runner for as
/// long as any member does.
fn kill_group(pgid: u32) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Ok(pgid) = i32::try_from(pgid) {
            let _ = killpg(Pid::from_raw(pgid), Signal::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;
}

/// Kill a runner and reap it.
fn terminate(child: &mut Child) {
    kill_group(child.id());
    let _ = child.kill();
    let _ = child.wait();
}
