// tests/static_executor.rs

//! Static-mode runs through the polled execution state machine.

#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::time::Duration;

use femexec::executor::{ExecutionState, FemExecutor};
use femexec_test_utils::scripts::write_result_file_script;

const POLL: Duration = Duration::from_millis(50);
const MAX_POLLS: usize = 100;

/// Poll `is_done` to completion, recording every observed state.
async fn poll_to_finish(fem: &mut FemExecutor) -> Vec<ExecutionState> {
    let mut seen = vec![fem.state()];
    for _ in 0..MAX_POLLS {
        let done = fem.is_done();
        let state = fem.state();
        if seen.last() != Some(&state) {
            seen.push(state);
        }
        if done {
            return seen;
        }
        tokio::time::sleep(POLL).await;
    }
    panic!("static run never finished; states seen: {seen:?}");
}

fn assert_forward_only(seen: &[ExecutionState]) {
    use ExecutionState::*;
    let order = [
        NotStarted,
        Executing,
        ExecutionFinished,
        ProcessingOutputFiles,
        Finished,
    ];
    let index = |s: &ExecutionState| order.iter().position(|o| o == s).unwrap();
    for pair in seen.windows(2) {
        assert!(
            index(&pair[0]) < index(&pair[1]),
            "state regressed: {seen:?}"
        );
    }
}

#[tokio::test]
async fn listing_command_runs_to_finished_without_output_processing() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let mut fem = FemExecutor::new("ls", "-l", dir.path());
    fem.set_wait(POLL);

    assert!(fem.start());
    assert_eq!(fem.state(), ExecutionState::Executing);

    let seen = poll_to_finish(&mut fem).await;
    assert_forward_only(&seen);
    assert!(
        !seen.contains(&ExecutionState::ProcessingOutputFiles),
        "no output processing was requested"
    );

    // Finished is terminal; is_done keeps reporting true.
    assert!(fem.is_done());
    assert_eq!(fem.state(), ExecutionState::Finished);
}

#[tokio::test]
async fn result_files_are_parsed_after_the_run() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let script = write_result_file_script(dir.path()).unwrap();

    let mut fem = FemExecutor::new(script.to_string_lossy(), "model.tcl", dir.path());
    fem.set_wait(POLL);
    fem.set_process_output_files(true);

    assert!(fem.start());
    let seen = poll_to_finish(&mut fem).await;
    assert_forward_only(&seen);
    assert!(seen.contains(&ExecutionState::ProcessingOutputFiles));

    assert_eq!(fem.displacements(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    assert_eq!(fem.forces(), vec![vec![5.0, 6.0], vec![7.0, 8.0]]);
}

#[tokio::test]
async fn missing_result_files_still_finish_with_empty_matrices() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let mut fem = FemExecutor::new("ls", "-l", dir.path());
    fem.set_wait(POLL);
    fem.set_process_output_files(true);

    assert!(fem.start());
    poll_to_finish(&mut fem).await;

    // Parse failure is logged, never raised; matrices stay empty.
    assert!(fem.displacements().is_empty());
    assert!(fem.forces().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn stdout_of_the_run_is_collected() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

    let mut fem = FemExecutor::new("ls", "-1", dir.path());
    fem.set_wait(POLL);
    assert!(fem.start());
    poll_to_finish(&mut fem).await;

    assert!(fem.output().contains("marker.txt"));
}

#[tokio::test]
async fn abort_mid_execution_is_safe_and_run_still_completes() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let mut fem = FemExecutor::new("sleep", "10", dir.path());
    fem.set_wait(POLL);

    assert!(fem.start());
    assert!(!fem.is_done());

    fem.abort().await;

    // The killed process counts as exited; the machine runs forward to
    // Finished instead of wedging.
    let seen = poll_to_finish(&mut fem).await;
    assert_forward_only(&seen);
}
