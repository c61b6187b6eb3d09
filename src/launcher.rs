//! Launcher implementation backed by `std::process`.

use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use log::debug;

use crate::traits::{ChildProcess, CommandSpec, ProcessError, ProcessLauncher, Result};

/// Launcher spawning real child processes via [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    /// Create a new system launcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for SystemLauncher {
    type Child = SystemChild;

    fn find_executable(&self, name: &str) -> Result<PathBuf> {
        let path =
            which::which(name).map_err(|_| ProcessError::MissingDependency(name.to_owned()))?;
        debug!("resolved '{name}' to {}", path.display());
        Ok(path)
    }

    fn spawn(&mut self, spec: &CommandSpec) -> Result<Self::Child> {
        debug!("spawning {spec}");
        let child = Command::new(spec.program())
            .args(spec.args())
            .spawn()
            .map_err(|err| spawn_failed(spec, &err))?;
        Ok(SystemChild { child })
    }

    fn spawn_producer(&mut self, spec: &CommandSpec) -> Result<Self::Child> {
        debug!("spawning producer {spec}");
        let child = Command::new(spec.program())
            .args(spec.args())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| spawn_failed(spec, &err))?;
        Ok(SystemChild { child })
    }

    fn spawn_consumer(&mut self, spec: &CommandSpec, input: ChildStdout) -> Result<Self::Child> {
        debug!("spawning consumer {spec}");
        let child = Command::new(spec.program())
            .args(spec.args())
            .stdin(Stdio::from(input))
            .spawn()
            .map_err(|err| spawn_failed(spec, &err))?;
        Ok(SystemChild { child })
    }
}

fn spawn_failed(spec: &CommandSpec, err: &std::io::Error) -> ProcessError {
    ProcessError::SpawnFailed(format!("{}: {err}", spec.program()))
}

/// Handle to a child process spawned by [`SystemLauncher`].
#[derive(Debug)]
pub struct SystemChild {
    child: Child,
}

impl ChildProcess for SystemChild {
    type Output = ChildStdout;

    fn take_output(&mut self) -> Result<ChildStdout> {
        self.child
            .stdout
            .take()
            .ok_or_else(|| ProcessError::StreamUnavailable("stdout was not captured".to_owned()))
    }

    fn poll_exit(&mut self) -> Result<Option<i32>> {
        Ok(self.child.try_wait()?.map(exit_code))
    }

    fn terminate(&mut self) -> Result<()> {
        // try_wait reaps the child if it has already exited; kill after
        // that point would fail.
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }
        self.child.kill()?;
        self.child.wait()?;
        Ok(())
    }
}

/// Children killed by a signal carry no exit code; those report -1.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
