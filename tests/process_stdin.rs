// tests/process_stdin.rs

//! Dynamic-mode messaging against a live interactive process: FIFO command
//! delivery over stdin, recognized responses over stdout, exit sentinel and
//! abort behavior. Mirrors how the hybrid-simulation controller drives a
//! solver console step by step.

#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::time::Duration;

use femexec::process::{QueueMessage, Recognizer, ResponseMonitor, StdinProcessHandle};
use femexec_test_utils::scripts::write_step_echo_script;

const POLL: Duration = Duration::from_secs(1);
const POLL_COUNT: usize = 6;

async fn bounded_poll(monitor: &mut ResponseMonitor) -> Option<String> {
    for _ in 0..POLL_COUNT {
        if let Some(rsp) = monitor.poll(POLL).await {
            return Some(rsp);
        }
    }
    None
}

#[tokio::test]
async fn ten_steps_round_trip_through_stdin_and_stdout() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let script = write_step_echo_script(dir.path()).unwrap();

    let mut pm = StdinProcessHandle::new(script.to_string_lossy(), vec!["PM Test".to_string()]);
    pm.set_work_dir(dir.path());
    pm.set_wait(Duration::from_millis(200));
    pm.start().expect("step-echo script must start");

    let commands = pm.commands().expect("command queue exists after start");
    let mut responses =
        ResponseMonitor::attach(pm.take_stdout().expect("stdout pipe"), Recognizer::AnyLine);

    let last_step = 11;
    for s in 1..last_step {
        commands
            .send(QueueMessage::Command(format!("Execute Step {s}")))
            .await
            .unwrap();
        let rsp = bounded_poll(&mut responses)
            .await
            .expect("response not received within bounded polls");
        assert!(
            rsp.contains(&s.to_string()),
            "response '{rsp}' must contain step number {s}"
        );
    }

    commands
        .send(QueueMessage::Exit("EXIT".to_string()))
        .await
        .unwrap();
    pm.abort().await;
    assert!(!pm.is_alive());
    assert!(pm.has_exited());
}

#[tokio::test]
async fn commands_are_delivered_in_submission_order() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let script = write_step_echo_script(dir.path()).unwrap();

    let mut pm = StdinProcessHandle::new(script.to_string_lossy(), vec![]);
    pm.set_work_dir(dir.path());
    pm.start().expect("step-echo script must start");

    let commands = pm.commands().expect("command queue exists after start");
    let mut responses =
        ResponseMonitor::attach(pm.take_stdout().expect("stdout pipe"), Recognizer::AnyLine);

    // Enqueue a burst without awaiting responses in between.
    for s in 1..6 {
        commands
            .send(QueueMessage::Command(format!("Execute Step {s}")))
            .await
            .unwrap();
    }

    // The echoed lines must come back in exactly the submitted order.
    for s in 1..6 {
        let rsp = bounded_poll(&mut responses)
            .await
            .expect("response not received within bounded polls");
        assert_eq!(rsp, format!("Execute Step {s}"));
    }

    commands
        .send(QueueMessage::Exit("EXIT".to_string()))
        .await
        .unwrap();
    pm.abort().await;
}

#[tokio::test]
async fn exit_sentinel_lets_the_process_finish_on_its_own() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let script = write_step_echo_script(dir.path()).unwrap();

    let mut pm = StdinProcessHandle::new(script.to_string_lossy(), vec![]);
    pm.set_work_dir(dir.path());
    pm.start().expect("step-echo script must start");

    let commands = pm.commands().expect("command queue exists after start");
    commands
        .send(QueueMessage::Exit("EXIT".to_string()))
        .await
        .unwrap();

    // The script reads EXIT and exits by itself; no abort needed.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !pm.has_exited() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "process did not exit on the sentinel"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn abort_releases_the_stdin_writer_despite_live_queue_senders() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let script = write_step_echo_script(dir.path()).unwrap();

    let mut pm = StdinProcessHandle::new(script.to_string_lossy(), vec![]);
    pm.set_work_dir(dir.path());
    pm.start().expect("step-echo script must start");

    // A caller-held sender outliving the abort must not park the writer.
    let commands = pm.commands().expect("command queue exists after start");

    pm.abort().await;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !pm.writer_finished() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "stdin writer still parked after abort"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    drop(commands);
}

#[tokio::test]
async fn abort_mid_run_leaves_process_not_alive() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let script = write_step_echo_script(dir.path()).unwrap();

    let mut pm = StdinProcessHandle::new(script.to_string_lossy(), vec![]);
    pm.set_work_dir(dir.path());
    pm.start().expect("step-echo script must start");
    assert!(pm.is_alive());

    pm.abort().await;
    assert!(!pm.is_alive());

    // Abort again; still safe.
    pm.abort().await;
    assert!(pm.has_exited());
}
