//! Mock launcher implementation for testing without spawning processes.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

use crate::traits::{ChildProcess, CommandSpec, ProcessError, ProcessLauncher, Result};

/// Scripted behavior for one child handed out by [`MockLauncher`].
#[derive(Debug, Clone)]
pub struct MockPlan {
    exit_code: Option<i32>,
    polls_before_exit: u32,
    output: Vec<u8>,
    spawn_fails: bool,
}

impl MockPlan {
    /// A child that exits with the given code on the first poll.
    #[must_use]
    pub const fn exits(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            polls_before_exit: 0,
            output: Vec::new(),
            spawn_fails: false,
        }
    }

    /// A child that keeps running until terminated.
    #[must_use]
    pub const fn never_exits() -> Self {
        Self {
            exit_code: None,
            polls_before_exit: 0,
            output: Vec::new(),
            spawn_fails: false,
        }
    }

    /// A spawn attempt that fails outright.
    #[must_use]
    pub const fn fails_to_spawn() -> Self {
        Self {
            exit_code: None,
            polls_before_exit: 0,
            output: Vec::new(),
            spawn_fails: true,
        }
    }

    /// Report "still running" for this many polls before exiting.
    #[must_use]
    pub const fn after_polls(mut self, polls: u32) -> Self {
        self.polls_before_exit = polls;
        self
    }

    /// Bytes the child writes to its captured output.
    #[must_use]
    pub fn with_output(mut self, output: &[u8]) -> Self {
        self.output = output.to_vec();
        self
    }
}

/// What the launcher observed about one spawned child.
#[derive(Debug, Clone)]
pub struct SpawnRecord {
    /// Program name passed to the spawn call.
    pub program: String,
    /// Bytes bound to the child's standard input when chained.
    pub piped_input: Option<Vec<u8>>,
    /// Set once the runner terminates the child.
    pub terminated: Rc<Cell<bool>>,
}

/// Mock launcher producing scripted children and recording every spawn.
pub struct MockLauncher {
    known: Vec<String>,
    plans: VecDeque<MockPlan>,
    records: Rc<RefCell<Vec<SpawnRecord>>>,
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLauncher {
    /// Create a mock launcher with no known executables and no plans.
    #[must_use]
    pub fn new() -> Self {
        Self {
            known: Vec::new(),
            plans: VecDeque::new(),
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Mark an executable as present on the fake search path.
    #[must_use]
    pub fn with_executable<S: Into<String>>(mut self, name: S) -> Self {
        self.known.push(name.into());
        self
    }

    /// Queue the plan for the next spawned child.
    ///
    /// Spawns beyond the queued plans get a child that exits 0 immediately.
    #[must_use]
    pub fn with_plan(mut self, plan: MockPlan) -> Self {
        self.plans.push_back(plan);
        self
    }

    /// Shared view of the spawn records, for assertions after the launcher
    /// has been moved into a runner.
    #[must_use]
    pub fn records(&self) -> Rc<RefCell<Vec<SpawnRecord>>> {
        Rc::clone(&self.records)
    }

    fn next_child(
        &mut self,
        spec: &CommandSpec,
        piped_input: Option<Vec<u8>>,
    ) -> Result<MockChild> {
        let plan = self.plans.pop_front().unwrap_or_else(|| MockPlan::exits(0));
        if plan.spawn_fails {
            return Err(ProcessError::SpawnFailed(format!(
                "{}: mock spawn failure",
                spec.program()
            )));
        }

        let terminated = Rc::new(Cell::new(false));
        self.records.borrow_mut().push(SpawnRecord {
            program: spec.program().to_owned(),
            piped_input,
            terminated: Rc::clone(&terminated),
        });

        Ok(MockChild {
            exit_code: plan.exit_code,
            polls_remaining: plan.polls_before_exit,
            output: Some(plan.output),
            terminated,
        })
    }
}

impl ProcessLauncher for MockLauncher {
    type Child = MockChild;

    fn find_executable(&self, name: &str) -> Result<PathBuf> {
        if self.known.iter().any(|known| known == name) {
            Ok(PathBuf::from(format!("/usr/bin/{name}")))
        } else {
            Err(ProcessError::MissingDependency(name.to_owned()))
        }
    }

    fn spawn(&mut self, spec: &CommandSpec) -> Result<Self::Child> {
        self.next_child(spec, None)
    }

    fn spawn_producer(&mut self, spec: &CommandSpec) -> Result<Self::Child> {
        self.next_child(spec, None)
    }

    fn spawn_consumer(&mut self, spec: &CommandSpec, input: Vec<u8>) -> Result<Self::Child> {
        self.next_child(spec, Some(input))
    }
}

/// Scripted child handle for testing.
#[derive(Debug)]
pub struct MockChild {
    exit_code: Option<i32>,
    polls_remaining: u32,
    output: Option<Vec<u8>>,
    terminated: Rc<Cell<bool>>,
}

impl ChildProcess for MockChild {
    type Output = Vec<u8>;

    fn take_output(&mut self) -> Result<Vec<u8>> {
        self.output
            .take()
            .ok_or_else(|| ProcessError::StreamUnavailable("mock output already taken".to_owned()))
    }

    fn poll_exit(&mut self) -> Result<Option<i32>> {
        if self.polls_remaining > 0 {
            self.polls_remaining -= 1;
            return Ok(None);
        }
        Ok(self.exit_code)
    }

    fn terminate(&mut self) -> Result<()> {
        self.terminated.set(true);
        Ok(())
    }
}
