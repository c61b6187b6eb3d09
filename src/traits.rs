//! Core traits and types for external process chaining.

use std::path::PathBuf;

/// Description of an external command: program name plus ordered arguments.
///
/// Immutable once constructed. The program name must be non-empty and denote
/// an executable; resolution against the search path happens at spawn time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command for the given program.
    #[must_use]
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn with_arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments in order.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of running a process or a process chain.
///
/// Interruption by the user is a normal outcome, not an error; the caller
/// decides what a non-zero exit code means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainResult {
    /// The final process in the chain exited with this code.
    Completed(i32),
    /// The user interrupted the run; still-running children were stopped.
    Interrupted,
}

/// Error type for process chaining operations.
#[derive(Debug)]
pub enum ProcessError {
    /// Required executable was not found on the search path.
    MissingDependency(String),
    /// A child process failed to launch.
    SpawnFailed(String),
    /// The captured output handle was unavailable for chaining.
    StreamUnavailable(String),
    /// The interrupt handler could not be installed.
    InterruptHandler(String),
    /// I/O error while managing a child process.
    Io(std::io::Error),
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDependency(name) => write!(f, "'{name}' not found in PATH"),
            Self::SpawnFailed(msg) => write!(f, "Failed to spawn process: {msg}"),
            Self::StreamUnavailable(msg) => write!(f, "Output stream unavailable: {msg}"),
            Self::InterruptHandler(msg) => {
                write!(f, "Failed to install interrupt handler: {msg}")
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ProcessError {}

impl From<std::io::Error> for ProcessError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result type for process chaining operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Abstraction over spawning external processes.
pub trait ProcessLauncher {
    /// The child handle type returned by the spawn methods.
    type Child: ChildProcess;

    /// Resolve an executable name on the search path.
    ///
    /// This check is advisory: a race between the check and a later spawn
    /// is accepted and not guarded against.
    fn find_executable(&self, name: &str) -> Result<PathBuf>;

    /// Spawn a process with stdio inherited from the caller.
    fn spawn(&mut self, spec: &CommandSpec) -> Result<Self::Child>;

    /// Spawn a process with its standard output captured for chaining.
    fn spawn_producer(&mut self, spec: &CommandSpec) -> Result<Self::Child>;

    /// Spawn a process with its standard input bound to an upstream child's
    /// captured output. Standard output stays inherited so the final
    /// consumer renders directly to the user.
    fn spawn_consumer(
        &mut self,
        spec: &CommandSpec,
        input: <Self::Child as ChildProcess>::Output,
    ) -> Result<Self::Child>;
}

/// Abstraction over a running child process.
///
/// Handles are owned exclusively by the runner that spawned them and expose
/// only what chaining needs: the captured output, a non-blocking exit check,
/// and termination.
pub trait ChildProcess {
    /// Handle to the child's captured standard output.
    type Output;

    /// Take the captured output handle.
    ///
    /// Fails if the child was not spawned with its output captured or the
    /// handle has already been taken.
    fn take_output(&mut self) -> Result<Self::Output>;

    /// Check for termination without blocking.
    ///
    /// Returns the exit code once the child has exited, `None` while it is
    /// still running.
    fn poll_exit(&mut self) -> Result<Option<i32>>;

    /// Request termination and reap the child. No-op if it already exited.
    fn terminate(&mut self) -> Result<()>;
}
