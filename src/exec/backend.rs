// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The [`Supervisor`](super::Supervisor) talks to a `ProcessBackend` instead
//! of `tokio::process` directly, so tests can swap in a fake that records
//! launches and terminations without touching the OS.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::debug;

/// How to start the supervised process.
///
/// The environment and the standard streams are inherited from this
/// process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program_display(&self) -> String {
        self.program.display().to_string()
    }
}

/// Trait abstracting OS process operations.
pub trait ProcessBackend: Send {
    /// Backend-specific live process.
    type Child: Send;

    /// Start a new instance.
    fn spawn(&mut self, spec: &LaunchSpec) -> Result<Self::Child>;

    /// OS process id, if the process has not been reaped yet.
    fn pid(&self, child: &Self::Child) -> Option<u32>;

    /// Ask the process to exit gracefully and wait until it has been reaped.
    ///
    /// Resolves to the exit code, if the process exited with one.
    fn terminate<'a>(
        &'a mut self,
        child: &'a mut Self::Child,
    ) -> Pin<Box<dyn Future<Output = Result<Option<i32>>> + Send + 'a>>;
}

/// Production backend built on `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessBackend;

impl ProcessBackend for TokioProcessBackend {
    type Child = Child;

    fn spawn(&mut self, spec: &LaunchSpec) -> Result<Child> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        cmd.spawn()
            .with_context(|| format!("spawning {:?}", spec.program))
    }

    fn pid(&self, child: &Child) -> Option<u32> {
        child.id()
    }

    fn terminate<'a>(
        &'a mut self,
        child: &'a mut Child,
    ) -> Pin<Box<dyn Future<Output = Result<Option<i32>>> + Send + 'a>> {
        Box::pin(async move {
            let pid = child
                .id()
                .context("process has already exited and been reaped")?;

            send_terminate(child, pid)?;
            debug!(pid, "termination signal sent; waiting for exit");

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for pid {pid} to exit"))?;
            Ok(status.code())
        })
    }
}

#[cfg(unix)]
fn send_terminate(_child: &mut Child, pid: u32) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).with_context(|| format!("pid {pid} out of range"))?;
    kill(Pid::from_raw(raw), Signal::SIGTERM)
        .with_context(|| format!("sending SIGTERM to pid {pid}"))
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child, pid: u32) -> Result<()> {
    child
        .start_kill()
        .with_context(|| format!("terminating pid {pid}"))
}
