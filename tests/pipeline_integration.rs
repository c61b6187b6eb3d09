//! Integration tests running real child processes.
//!
//! These tests exercise the runner against actual OS processes using the
//! standard unix utilities (`sh`, `cat`, `printf`, `sleep`), so they are
//! gated to unix targets. No camera hardware is required.

#![cfg(unix)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use rpicam_tools::{ChainResult, ChainRunner, CommandSpec, ProcessError, SystemLauncher};
use serial_test::serial;

/// Scratch file path unique to this test process.
fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rpicam_tools_{}_{name}", std::process::id()))
}

fn runner() -> ChainRunner<SystemLauncher> {
    ChainRunner::new(SystemLauncher::new())
}

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh").with_arg("-c").with_arg(script)
}

#[test]
#[serial]
fn test_missing_executable_reported() {
    let runner = runner();
    let result = runner.require_executable("definitely-not-a-real-binary-7f3a");
    assert!(matches!(result, Err(ProcessError::MissingDependency(_))));
}

#[test]
#[serial]
fn test_present_executable_accepted() {
    let runner = runner();
    runner.require_executable("sh").expect("sh should be on PATH");
}

#[test]
#[serial]
fn test_spawn_failure_is_an_error() {
    let mut runner = runner();
    let result = runner.run(&CommandSpec::new("/nonexistent/rpicam-tools-test-binary"));
    assert!(matches!(result, Err(ProcessError::SpawnFailed(_))));
}

#[test]
#[serial]
fn test_run_zero_exit() {
    let mut runner = runner();
    let result = runner.run(&sh("exit 0")).expect("run should succeed");
    assert_eq!(result, ChainResult::Completed(0));
}

#[test]
#[serial]
fn test_run_nonzero_exit_is_not_an_error() {
    let mut runner = runner();
    let result = runner.run(&sh("exit 3")).expect("run should succeed");
    assert_eq!(result, ChainResult::Completed(3));
}

#[test]
#[serial]
fn test_interrupt_while_blocked() {
    let mut runner = runner();
    let flag = runner.interrupt_flag();

    let setter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        flag.store(true, Ordering::SeqCst);
    });

    let started = Instant::now();
    let result = runner.run(&sh("sleep 5")).expect("run should succeed");
    setter.join().expect("setter thread should not panic");

    assert_eq!(result, ChainResult::Interrupted);
    assert!(
        started.elapsed() < Duration::from_secs(4),
        "child must not run to completion"
    );
}

#[test]
#[serial]
fn test_chain_preserves_byte_stream() {
    let sink = scratch_path("chain_bytes");
    let _ = fs::remove_file(&sink);

    let mut runner = runner();
    let producer = sh("printf ABCDEF");
    let consumer = sh(&format!("cat > {}", sink.display()));

    let result = runner
        .run_chain(&producer, &consumer)
        .expect("run_chain should succeed");
    assert_eq!(result, ChainResult::Completed(0));

    let observed = fs::read_to_string(&sink).expect("sink file should exist");
    assert_eq!(observed, "ABCDEF");

    let _ = fs::remove_file(&sink);
}

#[test]
#[serial]
fn test_chain_consumer_exit_ends_pipeline() {
    let mut runner = runner();
    // The producer would run for 5 seconds; the consumer exits at once.
    let producer = sh("sleep 5");
    let consumer = sh("exit 7");

    let started = Instant::now();
    let result = runner
        .run_chain(&producer, &consumer)
        .expect("run_chain should succeed");

    assert_eq!(result, ChainResult::Completed(7));
    assert!(
        started.elapsed() < Duration::from_secs(4),
        "pipeline must not wait for the producer"
    );
}

#[test]
#[serial]
fn test_chain_interrupt_stops_pipeline() {
    let mut runner = runner();
    let flag = runner.interrupt_flag();

    let setter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        flag.store(true, Ordering::SeqCst);
    });

    let producer = sh("while :; do printf x; sleep 1; done");
    let consumer = sh("cat > /dev/null");

    let started = Instant::now();
    let result = runner
        .run_chain(&producer, &consumer)
        .expect("run_chain should succeed");
    setter.join().expect("setter thread should not panic");

    assert_eq!(result, ChainResult::Interrupted);
    assert!(started.elapsed() < Duration::from_secs(4));
}
