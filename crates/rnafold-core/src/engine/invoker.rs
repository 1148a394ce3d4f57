//! Runs the external folding tool as a child process.
//!
//! Two adapters share one description of the call ([`Invocation`]) and one
//! classification of its result:
//!
//! - [`invoke`] suspends on the tokio runtime while the child runs. Dropping the
//!   returned future terminates the child.
//! - [`invoke_blocking`] blocks the calling thread and needs no runtime.
//!
//! The program is always started from an argument vector; no shell is involved.
//! The payload goes to the child's stdin, and stdout/stderr are drained while
//! waiting so a child producing a lot of output cannot stall on a full pipe.
//! When the timeout expires the child is sent SIGTERM, given `kill_grace` to
//! exit, then killed and reaped.

use crate::engine::error::FoldError;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Everything needed to run the tool once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Name used in messages.
    pub tool: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub stdin: String,
    pub timeout: Duration,
    pub kill_grace: Duration,
}

/// Captured result of a child that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Runs `invocation` without blocking the runtime.
///
/// # Errors
///
/// - [`FoldError::ToolNotFound`] if the program does not exist.
/// - [`FoldError::Timeout`] if it outlives `invocation.timeout`.
/// - [`FoldError::Execution`] on a non-zero exit, death by signal, or a pipe
///   failure.
pub async fn invoke(invocation: &Invocation) -> Result<InvocationOutcome, FoldError> {
    let started = Instant::now();

    let mut command = tokio::process::Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut guard = ChildGuard {
        child: None,
        grace: invocation.kill_grace,
    };
    let child = guard
        .child
        .insert(command.spawn().map_err(|e| spawn_error(invocation, e))?);
    debug!(
        tool = %invocation.tool,
        pid = child.id(),
        "Spawned {}",
        invocation.program.display()
    );

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let result = {
        let run = async {
            let (status, (), (), ()) = tokio::try_join!(
                child.wait(),
                feed_stdin(stdin, invocation.stdin.as_bytes()),
                drain(stdout, &mut stdout_buf),
                drain(stderr, &mut stderr_buf),
            )?;
            Ok::<_, io::Error>(status)
        };
        tokio::time::timeout(invocation.timeout, run).await
    };

    match result {
        Ok(Ok(status)) => {
            guard.disarm();
            complete(invocation, status, stdout_buf, stderr_buf, started.elapsed())
        }
        Ok(Err(e)) => {
            guard.terminate().await;
            Err(pipe_error(invocation, e, stderr_buf))
        }
        Err(_) => {
            warn!(
                tool = %invocation.tool,
                timeout = ?invocation.timeout,
                "Tool exceeded its timeout, terminating."
            );
            guard.terminate().await;
            Err(FoldError::Timeout {
                tool: invocation.tool.clone(),
                timeout: invocation.timeout,
                stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
            })
        }
    }
}

/// Runs `invocation` on the calling thread, blocking until the child exits or
/// the timeout fires.
///
/// # Errors
///
/// Same as [`invoke`].
pub fn invoke_blocking(invocation: &Invocation) -> Result<InvocationOutcome, FoldError> {
    let started = Instant::now();
    // `None` when the timeout is too large to represent: wait without limit.
    let deadline = started.checked_add(invocation.timeout);

    let mut child = std::process::Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(invocation, e))?;
    debug!(
        tool = %invocation.tool,
        pid = child.id(),
        "Spawned {}",
        invocation.program.display()
    );

    let (done_tx, done_rx) = mpsc::channel();
    let mut pending = 0;
    if let Some(mut stdin) = child.stdin.take() {
        let payload = invocation.stdin.clone().into_bytes();
        pending += spawn_pipe_worker(&done_tx, move || {
            ignore_broken_pipe(stdin.write_all(&payload))
        });
    }
    let stdout_buf = SharedBuffer::default();
    if let Some(source) = child.stdout.take() {
        pending += spawn_pipe_worker(&done_tx, drain_into(source, Arc::clone(&stdout_buf)));
    }
    let stderr_buf = SharedBuffer::default();
    if let Some(source) = child.stderr.take() {
        pending += spawn_pipe_worker(&done_tx, drain_into(source, Arc::clone(&stderr_buf)));
    }
    // Only the workers hold senders now, so a worker that dies disconnects.
    drop(done_tx);

    let timed_out = |stderr: &SharedBuffer| {
        warn!(
            tool = %invocation.tool,
            timeout = ?invocation.timeout,
            "Tool exceeded its timeout, terminating."
        );
        FoldError::Timeout {
            tool: invocation.tool.clone(),
            timeout: invocation.timeout,
            stderr: snapshot(stderr),
        }
    };

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                let remaining = remaining_until(deadline);
                if remaining.is_zero() {
                    terminate_blocking(&mut child, invocation.kill_grace);
                    return Err(timed_out(&stderr_buf));
                }
                thread::sleep(POLL_INTERVAL.min(remaining));
            }
            Err(e) => {
                terminate_blocking(&mut child, Duration::ZERO);
                return Err(pipe_error(invocation, e, Vec::new()));
            }
        }
    };

    // The pipes can outlive the child when a descendant inherited them, so the
    // workers are waited for under the same deadline.
    for _ in 0..pending {
        let received = match deadline {
            Some(deadline) => {
                done_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => done_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(pipe_error(invocation, e, take_buffer(&stderr_buf))),
            Err(RecvTimeoutError::Timeout) => return Err(timed_out(&stderr_buf)),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(pipe_error(
                    invocation,
                    io::Error::other("pipe thread panicked"),
                    take_buffer(&stderr_buf),
                ));
            }
        }
    }

    complete(
        invocation,
        status,
        take_buffer(&stdout_buf),
        take_buffer(&stderr_buf),
        started.elapsed(),
    )
}

fn remaining_until(deadline: Option<Instant>) -> Duration {
    match deadline {
        Some(deadline) => deadline.saturating_duration_since(Instant::now()),
        None => Duration::MAX,
    }
}

fn complete(
    invocation: &Invocation,
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    elapsed: Duration,
) -> Result<InvocationOutcome, FoldError> {
    let stdout = String::from_utf8_lossy(&stdout).into_owned();
    let stderr = String::from_utf8_lossy(&stderr).into_owned();
    debug!(
        tool = %invocation.tool,
        code = ?status.code(),
        elapsed = ?elapsed,
        "Tool exited."
    );

    if !status.success() {
        let message = match status.code() {
            Some(code) => format!("{} failed with return code {}", invocation.tool, code),
            None => format!("{} was terminated by a signal", invocation.tool),
        };
        return Err(FoldError::Execution {
            message,
            exit_code: status.code(),
            stderr,
        });
    }

    Ok(InvocationOutcome {
        exit_code: status.code(),
        stdout,
        stderr,
        elapsed,
    })
}

fn spawn_error(invocation: &Invocation, error: io::Error) -> FoldError {
    if error.kind() == io::ErrorKind::NotFound {
        FoldError::ToolNotFound {
            tool: invocation.tool.clone(),
            message: format!("'{}' does not exist", invocation.program.display()),
        }
    } else {
        FoldError::Execution {
            message: format!("Failed to start {}: {}", invocation.tool, error),
            exit_code: None,
            stderr: String::new(),
        }
    }
}

fn pipe_error(invocation: &Invocation, error: io::Error, stderr: Vec<u8>) -> FoldError {
    FoldError::Execution {
        message: format!("I/O error while communicating with {}: {}", invocation.tool, error),
        exit_code: None,
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

/// A child that exits without reading all of its input is not an error here;
/// its exit status decides.
fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

async fn feed_stdin(stdin: Option<ChildStdin>, payload: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    ignore_broken_pipe(stdin.write_all(payload).await)?;
    // Dropping stdin closes the pipe and signals end of input.
    drop(stdin);
    Ok(())
}

async fn drain<R: AsyncRead + Unpin>(source: Option<R>, buf: &mut Vec<u8>) -> io::Result<()> {
    let Some(mut source) = source else {
        return Ok(());
    };
    // read_buf is cancel safe: bytes read before a timeout stay in `buf`.
    while source.read_buf(buf).await? != 0 {}
    Ok(())
}

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

/// Runs `work` on a helper thread that reports its result on `done`.
/// Returns the number of results to expect.
fn spawn_pipe_worker<F>(done: &Sender<io::Result<()>>, work: F) -> usize
where
    F: FnOnce() -> io::Result<()> + Send + 'static,
{
    let done = done.clone();
    thread::spawn(move || {
        // The receiver is gone once the caller has given up on the deadline.
        done.send(work()).ok();
    });
    1
}

fn drain_into<R: Read + Send + 'static>(
    mut source: R,
    sink: SharedBuffer,
) -> impl FnOnce() -> io::Result<()> + Send + 'static {
    move || {
        let mut chunk = [0u8; 8192];
        loop {
            let n = source.read(&mut chunk)?;
            if n == 0 {
                return Ok(());
            }
            let Ok(mut sink) = sink.lock() else {
                return Err(io::Error::other("output buffer poisoned"));
            };
            sink.extend_from_slice(&chunk[..n]);
        }
    }
}

fn snapshot(buffer: &SharedBuffer) -> String {
    buffer
        .lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn take_buffer(buffer: &SharedBuffer) -> Vec<u8> {
    buffer
        .lock()
        .map(|mut bytes| std::mem::take(&mut *bytes))
        .unwrap_or_default()
}

#[cfg(unix)]
fn request_termination(pid: Option<u32>) {
    if let Some(pid) = pid.and_then(|pid| libc::pid_t::try_from(pid).ok()) {
        // SAFETY: kill(2) has no memory-safety preconditions. The pid belongs to
        // a child we have not reaped yet, so it cannot have been reused.
        unsafe {
            libc::kill(pid, libc::SIGTERM);
        }
    }
}

#[cfg(not(unix))]
fn request_termination(_pid: Option<u32>) {}

fn terminate_blocking(child: &mut std::process::Child, grace: Duration) {
    request_termination(Some(child.id()));
    let deadline = Instant::now().checked_add(grace);
    while !remaining_until(deadline).is_zero() {
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }
    if let Err(e) = child.kill() {
        debug!("Kill after grace period failed: {}", e);
    }
    if let Err(e) = child.wait() {
        warn!("Failed to reap terminated child: {}", e);
    }
}

async fn terminate(mut child: Child, grace: Duration) {
    request_termination(child.id());
    if tokio::time::timeout(grace, child.wait()).await.is_err() {
        if let Err(e) = child.kill().await {
            warn!("Failed to kill child after grace period: {}", e);
        }
    }
}

/// Owns a running child until it is known to have exited.
///
/// Dropping an armed guard (for example because the future awaiting the child
/// was cancelled) terminates the child in the background, or kills it at once
/// when no runtime is available.
struct ChildGuard {
    child: Option<Child>,
    grace: Duration,
}

impl ChildGuard {
    fn disarm(&mut self) {
        self.child = None;
    }

    async fn terminate(&mut self) {
        if let Some(child) = self.child.take() {
            terminate(child, self.grace).await;
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        debug!(pid = child.id(), "Cancelled while the tool was running, terminating.");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(terminate(child, self.grace));
            }
            Err(_) => {
                if let Err(e) = child.start_kill() {
                    debug!("Kill of cancelled child failed: {}", e);
                }
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::engine::error::FoldErrorKind;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("stub-tool");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn invocation(program: PathBuf, stdin: &str, timeout: Duration) -> Invocation {
        Invocation {
            tool: "stub-tool".to_string(),
            program,
            args: vec!["--noPS".to_string()],
            stdin: stdin.to_string(),
            timeout,
            kill_grace: Duration::from_millis(200),
        }
    }

    fn process_exists(pid: i32) -> bool {
        // SAFETY: signal 0 only checks for existence.
        unsafe { libc::kill(pid, 0) == 0 }
    }

    fn read_pid(path: &Path) -> i32 {
        fs::read_to_string(path).unwrap().trim().parse().unwrap()
    }

    #[tokio::test]
    async fn async_invoke_pipes_stdin_and_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "cat; echo note >&2");

        let outcome = invoke(&invocation(program, "AUGC\n@\n", Duration::from_secs(10)))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.stdout, "AUGC\n@\n");
        assert_eq!(outcome.stderr, "note\n");
    }

    #[test]
    fn blocking_invoke_pipes_stdin_and_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "cat; echo note >&2");

        let outcome =
            invoke_blocking(&invocation(program, "AUGC\n@\n", Duration::from_secs(10))).unwrap();

        assert_eq!(outcome.stdout, "AUGC\n@\n");
        assert_eq!(outcome.stderr, "note\n");
    }

    #[test]
    fn arguments_are_passed_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), r#"for a in "$@"; do echo "[$a]"; done"#);
        let mut call = invocation(program, "", Duration::from_secs(10));
        call.args = vec!["--noPS".into(), "; echo injected".into(), "$(id)".into()];

        let outcome = invoke_blocking(&call).unwrap();
        assert_eq!(outcome.stdout, "[--noPS]\n[; echo injected]\n[$(id)]\n");
    }

    #[tokio::test]
    async fn async_non_zero_exit_is_execution_error_with_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "echo boom >&2; exit 3");

        let err = invoke(&invocation(program, "AUGC\n", Duration::from_secs(10)))
            .await
            .unwrap_err();

        match err {
            FoldError::Execution {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blocking_non_zero_exit_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "echo boom >&2; exit 1");

        let err = invoke_blocking(&invocation(program, "", Duration::from_secs(10))).unwrap_err();
        assert_eq!(err.kind(), FoldErrorKind::Execution);
        assert!(err.to_string().contains("return code 1"));
        assert_eq!(err.diagnostic(), Some("boom\n"));
    }

    #[tokio::test]
    async fn missing_program_is_tool_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let call = invocation(dir.path().join("absent"), "", Duration::from_secs(1));

        assert_eq!(
            invoke(&call).await.unwrap_err().kind(),
            FoldErrorKind::ToolNotFound
        );
        assert_eq!(
            invoke_blocking(&call).unwrap_err().kind(),
            FoldErrorKind::ToolNotFound
        );
    }

    #[tokio::test]
    async fn async_timeout_terminates_and_reaps_child() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let program = stub(
            dir.path(),
            &format!("echo $$ > {}; echo started >&2; exec sleep 30", pid_file.display()),
        );

        let started = Instant::now();
        let err = invoke(&invocation(program, "", Duration::from_millis(300)))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FoldErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(err.diagnostic(), Some("started\n"));
        assert!(!process_exists(read_pid(&pid_file)));
    }

    #[test]
    fn blocking_timeout_terminates_and_reaps_child() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let program = stub(
            dir.path(),
            &format!("echo $$ > {}; exec sleep 30", pid_file.display()),
        );

        let started = Instant::now();
        let err =
            invoke_blocking(&invocation(program, "", Duration::from_millis(300))).unwrap_err();

        assert_eq!(err.kind(), FoldErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!process_exists(read_pid(&pid_file)));
    }

    #[tokio::test]
    async fn child_ignoring_sigterm_is_killed_after_grace() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let program = stub(
            dir.path(),
            &format!("trap '' TERM; echo $$ > {}; exec sleep 30", pid_file.display()),
        );

        let started = Instant::now();
        let err = invoke(&invocation(program.clone(), "", Duration::from_millis(300)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FoldErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!process_exists(read_pid(&pid_file)));

        fs::remove_file(&pid_file).unwrap();
        let err =
            invoke_blocking(&invocation(program, "", Duration::from_millis(300))).unwrap_err();
        assert_eq!(err.kind(), FoldErrorKind::Timeout);
        assert!(!process_exists(read_pid(&pid_file)));
    }

    #[tokio::test]
    async fn cancelling_the_future_terminates_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let program = stub(
            dir.path(),
            &format!("echo $$ > {}; exec sleep 30", pid_file.display()),
        );
        let call = invocation(program, "", Duration::from_secs(30));

        let cancelled = tokio::time::timeout(Duration::from_millis(300), invoke(&call)).await;
        assert!(cancelled.is_err());

        let pid = read_pid(&pid_file);
        let deadline = Instant::now() + Duration::from_secs(5);
        while process_exists(pid) && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!process_exists(pid));
    }

    #[tokio::test]
    async fn large_output_does_not_deadlock() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(
            dir.path(),
            "i=0; while [ $i -lt 20000 ]; do echo 'AUGCAUGCAUGCAUGCAUGCAUGCAUGCAUGCAUGC'; echo 'noise' >&2; i=$((i+1)); done",
        );
        let call = invocation(program, "", Duration::from_secs(30));

        let outcome = invoke(&call).await.unwrap();
        assert_eq!(outcome.stdout.lines().count(), 20000);

        let outcome = invoke_blocking(&call).unwrap();
        assert_eq!(outcome.stderr.lines().count(), 20000);
    }

    #[tokio::test]
    async fn child_that_ignores_stdin_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "echo done");
        let payload = "A".repeat(1 << 20);
        let call = invocation(program, &payload, Duration::from_secs(10));

        assert_eq!(invoke(&call).await.unwrap().stdout, "done\n");
        assert_eq!(invoke_blocking(&call).unwrap().stdout, "done\n");
    }

    #[tokio::test]
    async fn descendant_holding_output_open_hits_the_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "sleep 5 & echo done");
        let call = invocation(program, "", Duration::from_millis(300));

        let started = Instant::now();
        let err = invoke_blocking(&call).unwrap_err();
        assert_eq!(err.kind(), FoldErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(3));

        let started = Instant::now();
        let err = invoke(&call).await.unwrap_err();
        assert_eq!(err.kind(), FoldErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn unbounded_timeout_and_grace_do_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "cat");
        let mut call = invocation(program, "AUGC\n", Duration::MAX);
        call.kill_grace = Duration::MAX;

        assert_eq!(invoke_blocking(&call).unwrap().stdout, "AUGC\n");
        assert_eq!(invoke(&call).await.unwrap().stdout, "AUGC\n");
    }

    #[test]
    fn unbounded_grace_waits_for_terminated_child() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "exec sleep 30");
        let mut call = invocation(program, "", Duration::from_millis(200));
        call.kill_grace = Duration::MAX;

        let started = Instant::now();
        let err = invoke_blocking(&call).unwrap_err();
        assert_eq!(err.kind(), FoldErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn guard_dropped_outside_a_runtime_kills_the_child() {
        fn is_dead_or_zombie(pid: u32) -> bool {
            match fs::read_to_string(format!("/proc/{pid}/stat")) {
                Ok(stat) => stat.rsplit(')').next().and_then(|s| s.split_whitespace().next()) == Some("Z"),
                Err(_) => true,
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let program = stub(dir.path(), "exec sleep 30");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let child = {
            let _entered = runtime.enter();
            tokio::process::Command::new(&program).spawn().unwrap()
        };
        let pid = child.id().unwrap();

        drop(ChildGuard {
            child: Some(child),
            grace: Duration::from_secs(5),
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while !is_dead_or_zombie(pid) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        assert!(is_dead_or_zombie(pid));
    }
}
