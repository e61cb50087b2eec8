// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker: supervises one external process and its output log
//!
//! A worker is created once, runs its process at most once and is discarded
//! by the caller, who also removes its log file. `start()` resolves only when
//! the process has exited, so callers spawn it on its own task and poll
//! `status()` or call `stop()` from elsewhere:
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use jw_core::{Worker, WorkerStatus};
//!
//! let worker = Arc::new(Worker::new("sleep", ["5"])?);
//! let task = tokio::spawn({
//!     let worker = Arc::clone(&worker);
//!     async move { worker.start().await }
//! });
//! while worker.status() != WorkerStatus::Running {
//!     tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//! }
//! worker.stop()?;
//! let _ = task.await?;
//! assert_eq!(worker.status(), WorkerStatus::Killed);
//! worker.remove_logs()?;
//! # Ok(())
//! # }
//! ```

use crate::config::WorkerConfig;
use crate::error::{ConstructionError, LogError, StartError, StopError};
use crate::id::{IdGen, UuidIdGen, WorkerId};
use crate::status::WorkerStatus;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex};
use tracing::Instrument;

/// Read size for draining process output
const DRAIN_CHUNK: usize = 8 * 1024;

/// Supervisor for a single external process
#[derive(Debug)]
pub struct Worker {
    id: WorkerId,
    command: String,
    args: Vec<String>,
    log_path: PathBuf,
    state: RwLock<State>,
}

/// Everything guarded by the status lock
#[derive(Debug)]
struct State {
    status: WorkerStatus,
    process: Option<ProcessHandle>,
    exit_code: Option<i32>,
    log_error: Option<String>,
}

/// Capability to terminate the running process.
///
/// The execution task owns the `Child`; `stop()` only holds the request
/// channel, so it can never signal a pid that was already reaped and reused.
/// Sending borrows the channel, so a failed `stop()` leaves the handle intact.
#[derive(Debug)]
struct ProcessHandle {
    pid: Option<u32>,
    kill: mpsc::UnboundedSender<()>,
}

/// Settles the worker if `start()` is dropped before the process is reaped.
///
/// The child is spawned with `kill_on_drop`, so cancelling the future kills
/// it; this moves the status to `killed` and releases the handle.
struct CancelGuard<'a> {
    worker: &'a Worker,
    armed: bool,
}

impl CancelGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.worker.write_state();
        state.process = None;
        if self.worker.transition(&mut state, WorkerStatus::Killed) {
            tracing::warn!(worker_id = %self.worker.id, "start cancelled, process killed");
        }
    }
}

impl Worker {
    /// Create a worker configured from the environment with a UUID id
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(command, args, &WorkerConfig::from_env(), &UuidIdGen)
    }

    /// Create a worker with explicit log configuration and id source
    ///
    /// Creates the log directory if needed and allocates an empty log file
    /// named after the worker id.
    pub fn with_config<I, S>(
        command: impl Into<String>,
        args: I,
        config: &WorkerConfig,
        id_gen: &impl IdGen,
    ) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id_gen.next_id()?;

        std::fs::create_dir_all(config.log_dir()).map_err(|source| {
            ConstructionError::LogDir {
                path: config.log_dir().to_path_buf(),
                source,
            }
        })?;

        let log_path = config.log_path(id.as_str());
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&log_path)
            .map_err(|source| ConstructionError::LogFile {
                path: log_path.clone(),
                source,
            })?;

        let command = command.into();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        tracing::debug!(
            worker_id = %id,
            command = %command,
            args = ?args,
            log_path = %log_path.display(),
            "worker created"
        );

        Ok(Self {
            id,
            command,
            args,
            log_path,
            state: RwLock::new(State {
                status: WorkerStatus::Pending,
                process: None,
                exit_code: None,
                log_error: None,
            }),
        })
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn worker_id(&self) -> &WorkerId {
        &self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Current status; never blocks on the execution task
    pub fn status(&self) -> WorkerStatus {
        self.read_state().status
    }

    /// Exit code, once the process has exited on its own or been reaped.
    ///
    /// `None` before exit and when the process was terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.read_state().exit_code
    }

    /// OS pid of the process while it is being supervised
    pub fn pid(&self) -> Option<u32> {
        self.read_state().process.as_ref().and_then(|p| p.pid)
    }

    /// First failure writing process output to the log, if any.
    ///
    /// A log failure does not change the status of a successful run.
    pub fn log_write_error(&self) -> Option<String> {
        self.read_state().log_error.clone()
    }

    /// Run the process to completion, capturing its output to the log file
    pub async fn start(&self) -> Result<(), StartError> {
        let span = tracing::info_span!("worker.start", worker_id = %self.id, command = %self.command);
        self.execute().instrument(span).await
    }

    async fn execute(&self) -> Result<(), StartError> {
        {
            let mut state = self.write_state();
            if !self.transition(&mut state, WorkerStatus::Started) {
                return Err(StartError::AlreadyStarted(state.status));
            }
        }
        let mut guard = CancelGuard {
            worker: self,
            armed: true,
        };

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let log = match tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
        {
            Ok(file) => file,
            Err(source) => {
                guard.disarm();
                return Err(self.fail(StartError::LogOpen {
                    path: self.log_path.clone(),
                    source,
                }))
            }
        };

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                guard.disarm();
                return Err(self.fail(StartError::Spawn {
                    command: self.command.clone(),
                    source,
                }))
            }
        };

        let (kill_tx, kill_rx) = mpsc::unbounded_channel();
        {
            let mut state = self.write_state();
            state.process = Some(ProcessHandle {
                pid: child.id(),
                kill: kill_tx,
            });
            self.transition(&mut state, WorkerStatus::Running);
        }
        tracing::info!(pid = ?child.id(), "process running");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let sink = Mutex::new(log);

        // Both pipes drain while we wait: a child blocked on a full pipe would
        // otherwise never exit. The join is the barrier before the terminal
        // status becomes visible.
        let (out_written, err_written, waited) = tokio::join!(
            drain(stdout, &sink),
            drain(stderr, &sink),
            wait_or_kill(&mut child, kill_rx),
        );

        let mut log = sink.into_inner();
        let mut log_error = out_written.err().or(err_written.err());
        if let Err(e) = log.flush().await {
            log_error.get_or_insert(e);
        }
        drop(log);

        guard.disarm();
        let mut state = self.write_state();
        state.process = None;
        if let Some(e) = log_error {
            tracing::warn!(error = %e, "failed writing process output to log");
            state.log_error = Some(e.to_string());
        }

        let exit = match waited {
            Ok(exit) => exit,
            Err(e) => {
                tracing::error!(error = %e, "failed waiting for process");
                self.transition(&mut state, WorkerStatus::Error);
                return Err(StartError::Wait(e));
            }
        };

        state.exit_code = exit.code();
        tracing::info!(exit_code = ?state.exit_code, "process exited");

        let result = if exit.success() {
            self.transition(&mut state, WorkerStatus::Finished);
            Ok(())
        } else {
            self.transition(&mut state, WorkerStatus::Error);
            Err(StartError::Exit {
                code: state.exit_code,
            })
        };

        if state.status == WorkerStatus::Killed {
            return Err(StartError::Killed);
        }
        result
    }

    /// Forcefully terminate the running process
    ///
    /// Does not wait for the process to exit; the execution task observes
    /// the exit and leaves the status at `killed`.
    pub fn stop(&self) -> Result<(), StopError> {
        let _span = tracing::info_span!("worker.stop", worker_id = %self.id).entered();

        let mut state = self.write_state();
        if !state.status.is_running() {
            return Err(StopError::NotRunning(state.status));
        }
        let process = state.process.as_ref().ok_or(StopError::InvalidProcess)?;
        process.kill.send(()).map_err(|_| StopError::Signal)?;

        self.transition(&mut state, WorkerStatus::Killed);
        tracing::info!("kill requested");
        Ok(())
    }

    /// Open the log file for reading. Unavailable while running.
    pub fn read_logs(&self) -> Result<File, LogError> {
        let state = self.read_state();
        if state.status.is_running() {
            return Err(LogError::Unavailable(state.status));
        }
        Ok(File::open(&self.log_path)?)
    }

    /// Delete the log file. Unavailable while running.
    pub fn remove_logs(&self) -> Result<(), LogError> {
        let state = self.read_state();
        if state.status.is_running() {
            return Err(LogError::Unavailable(state.status));
        }
        std::fs::remove_file(&self.log_path)?;
        tracing::debug!(worker_id = %self.id, log_path = %self.log_path.display(), "logs removed");
        Ok(())
    }

    /// Guarded status setter; edges outside the state machine are ignored
    fn transition(&self, state: &mut State, next: WorkerStatus) -> bool {
        let current = state.status;
        if !current.can_transition_to(next) {
            tracing::debug!(worker_id = %self.id, %current, %next, "status transition ignored");
            return false;
        }
        state.status = next;
        tracing::info!(worker_id = %self.id, from = %current, to = %next, "status changed");
        true
    }

    fn fail(&self, err: StartError) -> StartError {
        tracing::error!(error = %err, "start failed");
        let mut state = self.write_state();
        self.transition(&mut state, WorkerStatus::Error);
        err
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Copy a stream into the shared log until EOF.
///
/// After a write failure the stream keeps being read (and discarded) so the
/// child never blocks on a full pipe; the first error is returned at EOF.
async fn drain<R>(stream: Option<R>, sink: &Mutex<tokio::fs::File>) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = stream else {
        return Ok(0);
    };

    let mut buf = vec![0u8; DRAIN_CHUNK];
    let mut written = 0u64;
    let mut failure = None;
    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                failure.get_or_insert(e);
                break;
            }
        };
        if failure.is_some() {
            continue;
        }
        let mut file = sink.lock().await;
        match file.write_all(&buf[..n]).await {
            Ok(()) => written += n as u64,
            Err(e) => failure = Some(e),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(written),
    }
}

/// Wait for the child, killing it first if a kill request arrives
async fn wait_or_kill(
    child: &mut Child,
    mut kill: mpsc::UnboundedReceiver<()>,
) -> io::Result<ExitStatus> {
    tokio::select! {
        status = child.wait() => status,
        Some(()) = kill.recv() => {
            if let Err(e) = child.start_kill() {
                tracing::warn!(error = %e, "failed to signal process");
            }
            child.wait().await
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
