use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use config_watcher::exec::{LaunchSpec, ProcessBackend};

/// A "process" handed out by [`FakeProcessBackend`].
#[derive(Debug)]
pub struct FakeChild {
    pub pid: u32,
}

#[derive(Debug, Default)]
struct Inner {
    next_pid: u32,
    spawn_calls: usize,
    terminate_calls: usize,
    launched: Vec<u32>,
    terminated: Vec<u32>,
    live: BTreeSet<u32>,
    specs: Vec<LaunchSpec>,
    fail_launch: bool,
    fail_terminate: bool,
    terminate_delay: Option<Duration>,
}

/// Shared view into a [`FakeProcessBackend`], kept by the test after the
/// backend has been moved into a supervisor.
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    inner: Arc<Mutex<Inner>>,
}

impl FakeProbe {
    pub fn spawn_calls(&self) -> usize {
        self.inner.lock().unwrap().spawn_calls
    }

    pub fn terminate_calls(&self) -> usize {
        self.inner.lock().unwrap().terminate_calls
    }

    /// Pids of successfully launched processes, in launch order.
    pub fn launched(&self) -> Vec<u32> {
        self.inner.lock().unwrap().launched.clone()
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.inner.lock().unwrap().terminated.clone()
    }

    /// Pids launched and not yet terminated.
    pub fn live(&self) -> Vec<u32> {
        self.inner.lock().unwrap().live.iter().copied().collect()
    }

    pub fn specs(&self) -> Vec<LaunchSpec> {
        self.inner.lock().unwrap().specs.clone()
    }

    pub fn set_fail_launch(&self, fail: bool) {
        self.inner.lock().unwrap().fail_launch = fail;
    }

    pub fn set_fail_terminate(&self, fail: bool) {
        self.inner.lock().unwrap().fail_terminate = fail;
    }

    pub fn set_terminate_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().terminate_delay = Some(delay);
    }
}

/// A fake process backend that:
/// - hands out increasing pids instead of spawning processes
/// - records every launch and termination
/// - can be told to fail or to take a while to terminate.
#[derive(Debug, Default)]
pub struct FakeProcessBackend {
    probe: FakeProbe,
}

impl FakeProcessBackend {
    pub fn new() -> (Self, FakeProbe) {
        let probe = FakeProbe::default();
        (
            Self {
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl ProcessBackend for FakeProcessBackend {
    type Child = FakeChild;

    fn spawn(&mut self, spec: &LaunchSpec) -> Result<FakeChild> {
        let mut inner = self.probe.inner.lock().unwrap();
        inner.spawn_calls += 1;
        if inner.fail_launch {
            return Err(anyhow!("spawning {:?}: No such file or directory", spec.program));
        }

        inner.next_pid += 1;
        let pid = 1000 + inner.next_pid;
        inner.launched.push(pid);
        inner.live.insert(pid);
        inner.specs.push(spec.clone());
        Ok(FakeChild { pid })
    }

    fn pid(&self, child: &FakeChild) -> Option<u32> {
        Some(child.pid)
    }

    fn terminate<'a>(
        &'a mut self,
        child: &'a mut FakeChild,
    ) -> Pin<Box<dyn Future<Output = Result<Option<i32>>> + Send + 'a>> {
        let inner = Arc::clone(&self.probe.inner);
        let pid = child.pid;

        Box::pin(async move {
            let delay = {
                let mut guard = inner.lock().unwrap();
                guard.terminate_calls += 1;
                guard.terminate_delay
            };

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut guard = inner.lock().unwrap();
            if guard.fail_terminate {
                return Err(anyhow!("sending SIGTERM to pid {pid}: ESRCH"));
            }
            guard.live.remove(&pid);
            guard.terminated.push(pid);
            Ok(Some(0))
        })
    }
}
