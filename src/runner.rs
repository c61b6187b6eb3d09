//! Process chain supervision.
//!
//! [`ChainRunner`] launches one or two external commands, optionally binding
//! the first's standard output to the second's standard input, blocks until
//! the pipeline is done, and reports how it ended. User interruption becomes
//! a normal [`ChainResult::Interrupted`] outcome rather than an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::traits::{ChainResult, ChildProcess, CommandSpec, ProcessError, ProcessLauncher, Result};

/// How often the supervision loop checks for exits and interruption.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs external commands as one- or two-stage pipelines.
///
/// The runner owns its launcher and an explicit interrupt flag, so several
/// independent runners can coexist in one program and tests can inject a
/// mock launcher and flip the flag directly.
pub struct ChainRunner<L: ProcessLauncher> {
    launcher: L,
    interrupt: Arc<AtomicBool>,
}

impl<L: ProcessLauncher> ChainRunner<L> {
    /// Create a runner over the given launcher.
    #[must_use]
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The runner's interrupt flag.
    ///
    /// Setting it makes a blocked [`run`](Self::run) or
    /// [`run_chain`](Self::run_chain) stop its children and return
    /// [`ChainResult::Interrupted`].
    #[must_use]
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Install a Ctrl-C handler that flips this runner's interrupt flag.
    ///
    /// The handler is process-wide and can only be installed once.
    pub fn install_interrupt_handler(&self) -> Result<()> {
        let flag = Arc::clone(&self.interrupt);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .map_err(|err| ProcessError::InterruptHandler(err.to_string()))
    }

    /// Check that a required executable is present on the search path.
    ///
    /// Succeeds silently; fails with [`ProcessError::MissingDependency`]
    /// before anything is launched. The check is advisory: a race between
    /// check and launch is accepted.
    pub fn require_executable(&self, name: &str) -> Result<()> {
        self.launcher.find_executable(name).map(|_| ())
    }

    /// Run a single command with stdio inherited from the caller and block
    /// until it exits.
    ///
    /// A non-zero exit code is reported as [`ChainResult::Completed`], never
    /// as an error; what it means is the caller's policy.
    pub fn run(&mut self, primary: &CommandSpec) -> Result<ChainResult> {
        let child = self.launcher.spawn(primary)?;
        self.supervise(child, None)
    }

    /// Run `primary` with its standard output piped into `secondary` and
    /// block until `secondary` exits.
    ///
    /// The consumer determines when the pipeline is done; a producer still
    /// running at that point is terminated. Byte transport between the two
    /// children is carried entirely by the OS pipe, backpressure included.
    pub fn run_chain(
        &mut self,
        primary: &CommandSpec,
        secondary: &CommandSpec,
    ) -> Result<ChainResult> {
        let mut producer = self.launcher.spawn_producer(primary)?;
        // The producer must be running with its output attached before the
        // consumer launches.
        let stream = match producer.take_output() {
            Ok(stream) => stream,
            Err(err) => {
                stop(&mut producer);
                return Err(err);
            }
        };
        let consumer = match self.launcher.spawn_consumer(secondary, stream) {
            Ok(child) => child,
            Err(err) => {
                stop(&mut producer);
                return Err(err);
            }
        };
        self.supervise(consumer, Some(producer))
    }

    /// Block until `child` exits or the interrupt flag is raised. Any
    /// `upstream` producer is stopped once the supervised child is gone,
    /// whichever way that happens.
    fn supervise(&self, mut child: L::Child, mut upstream: Option<L::Child>) -> Result<ChainResult> {
        loop {
            if self.interrupt.load(Ordering::SeqCst) {
                debug!("interrupt received, stopping children");
                stop(&mut child);
                if let Some(producer) = upstream.as_mut() {
                    stop(producer);
                }
                return Ok(ChainResult::Interrupted);
            }

            match child.poll_exit() {
                Ok(Some(code)) => {
                    if let Some(producer) = upstream.as_mut() {
                        stop(producer);
                    }
                    return Ok(ChainResult::Completed(code));
                }
                Ok(None) => {}
                Err(err) => {
                    if let Some(producer) = upstream.as_mut() {
                        stop(producer);
                    }
                    return Err(err);
                }
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Best-effort termination; failures are logged, not propagated.
fn stop<C: ChildProcess>(child: &mut C) {
    if let Err(err) = child.terminate() {
        warn!("failed to stop child: {err}");
    }
}
