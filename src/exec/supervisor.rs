// src/exec/supervisor.rs

//! Lifecycle owner of the supervised process.
//!
//! State machine:
//!
//! ```text
//! NotStarted -> Running -> Terminating -> Running   (restart)
//! NotStarted -> Running -> Stopped                  (shutdown)
//! ```
//!
//! If a restart stops the old instance but cannot launch the new one, the
//! supervisor ends up `Stopped` with no child until the caller launches
//! again.

use tracing::{error, info};

use crate::errors::{ConfigWatcherError, Result};
use crate::exec::backend::{LaunchSpec, ProcessBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotStarted,
    Running,
    Terminating,
    Stopped,
}

/// A live supervised process.
///
/// Only obtainable from [`Supervisor::launch`] / [`Supervisor::restart`] and
/// consumed again by `restart` / `stop`, so nothing else can signal or wait
/// on the process.
#[derive(Debug)]
pub struct ProcessHandle<C> {
    child: C,
    pid: Option<u32>,
}

impl<C> ProcessHandle<C> {
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }
}

#[derive(Debug)]
pub struct Supervisor<B: ProcessBackend> {
    spec: LaunchSpec,
    backend: B,
    state: ProcessState,
}

impl<B: ProcessBackend> Supervisor<B> {
    pub fn new(spec: LaunchSpec, backend: B) -> Self {
        Self {
            spec,
            backend,
            state: ProcessState::NotStarted,
        }
    }

    pub fn spec(&self) -> &LaunchSpec {
        &self.spec
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a new instance of the configured process.
    pub fn launch(&mut self) -> Result<ProcessHandle<B::Child>> {
        let child = match self.backend.spawn(&self.spec) {
            Ok(child) => child,
            Err(err) => {
                self.state = match self.state {
                    ProcessState::NotStarted => ProcessState::NotStarted,
                    _ => ProcessState::Stopped,
                };
                return Err(ConfigWatcherError::LaunchFailure {
                    program: self.spec.program_display(),
                    reason: format!("{err:#}"),
                });
            }
        };

        let pid = self.backend.pid(&child);
        self.state = ProcessState::Running;
        info!(
            pid = ?pid,
            program = %self.spec.program_display(),
            args = ?self.spec.args,
            "process started"
        );

        Ok(ProcessHandle { child, pid })
    }

    /// Gracefully stop the process behind `handle` and launch a replacement.
    ///
    /// - `None` is rejected with `InvalidState` before any OS operation.
    /// - A failed stop returns `RestartFailure`; the old handle is gone and
    ///   no replacement is launched.
    /// - A failed launch after a successful stop returns `LaunchFailure`.
    pub async fn restart(
        &mut self,
        handle: Option<ProcessHandle<B::Child>>,
    ) -> Result<ProcessHandle<B::Child>> {
        let Some(handle) = handle else {
            error!("child process is missing; refusing to restart");
            return Err(ConfigWatcherError::InvalidState(
                "restart requested without a live process handle".to_string(),
            ));
        };

        let pid = handle.pid;
        info!(pid = ?pid, "restart requested; stopping current process");
        self.terminate(handle).await.map_err(|err| {
            ConfigWatcherError::RestartFailure {
                pid,
                reason: format!("{err:#}"),
            }
        })?;

        self.launch()
    }

    /// Gracefully stop the process for shutdown. `None` is a no-op.
    pub async fn stop(&mut self, handle: Option<ProcessHandle<B::Child>>) -> Result<()> {
        let Some(handle) = handle else {
            self.state = ProcessState::Stopped;
            return Ok(());
        };

        let pid = handle.pid;
        info!(pid = ?pid, "stopping process");
        self.terminate(handle).await?;
        Ok(())
    }

    async fn terminate(&mut self, mut handle: ProcessHandle<B::Child>) -> anyhow::Result<()> {
        self.state = ProcessState::Terminating;
        let result = self.backend.terminate(&mut handle.child).await;
        self.state = ProcessState::Stopped;

        let code = result?;
        info!(pid = ?handle.pid, exit_code = ?code, "process exited");
        Ok(())
    }
}
