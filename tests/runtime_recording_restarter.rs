// tests/runtime_recording_restarter.rs

use std::error::Error;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

use relaunch::engine::{CoreSupervisor, Runtime, SupervisorEvent};
use relaunch::errors::{RelaunchError, Result};
use relaunch::types::ChangeOps;
use relaunch_test_utils::builders::{change, IdentityBuilder};
use relaunch_test_utils::fake_restarter::{RecordingRestarter, RestartOutcome};
use relaunch_test_utils::{init_tracing, wait_until};

type TestResult = std::result::Result<(), Box<dyn Error>>;

const SETTLE: Duration = Duration::from_millis(100);

fn start_runtime(
    restarter: RecordingRestarter,
) -> (mpsc::Sender<SupervisorEvent>, JoinHandle<Result<()>>) {
    let identity = IdentityBuilder::new("/usr/local/bin/app")
        .arg("--dir")
        .arg("src")
        .env("APP_MODE", "dev")
        .build();

    let (tx, rx) = mpsc::channel::<SupervisorEvent>(16);
    let runtime = Runtime::new(CoreSupervisor::new(SETTLE), rx, restarter, identity);
    (tx, tokio::spawn(runtime.run()))
}

fn file_changed(ops: ChangeOps) -> SupervisorEvent {
    SupervisorEvent::FileChanged(change("/work/src/main.rs", ops))
}

async fn shutdown(
    tx: mpsc::Sender<SupervisorEvent>,
    handle: JoinHandle<Result<()>>,
) -> Result<()> {
    tx.send(SupervisorEvent::ShutdownRequested)
        .await
        .expect("runtime still listening");
    timeout(Duration::from_secs(3), handle)
        .await
        .expect("runtime did not stop within 3 seconds")
        .expect("runtime task panicked")
}

#[tokio::test]
async fn write_restarts_once_with_captured_identity() -> TestResult {
    init_tracing();

    let restarter = RecordingRestarter::default();
    let (tx, handle) = start_runtime(restarter.clone());

    let sent_at = Instant::now();
    tx.send(file_changed(ChangeOps::WRITE)).await?;

    wait_until(|| restarter.count() == 1).await;
    // Give a stray second restart a chance to show up.
    tokio::time::sleep(SETTLE * 2).await;

    let attempts = restarter.attempts();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].at.duration_since(sent_at) >= SETTLE);

    let identity = &attempts[0].identity;
    assert_eq!(identity.exe().to_str(), Some("/usr/local/bin/app"));
    assert_eq!(identity.args().len(), 3);
    assert_eq!(identity.env().len(), 1);

    shutdown(tx, handle).await?;
    Ok(())
}

#[tokio::test]
async fn chmod_only_never_restarts() -> TestResult {
    init_tracing();

    let restarter = RecordingRestarter::default();
    let (tx, handle) = start_runtime(restarter.clone());

    tx.send(file_changed(ChangeOps::CHMOD)).await?;
    tokio::time::sleep(SETTLE * 3).await;

    assert_eq!(restarter.count(), 0);
    shutdown(tx, handle).await?;
    Ok(())
}

#[tokio::test]
async fn burst_of_changes_collapses_into_one_restart() -> TestResult {
    init_tracing();

    let restarter = RecordingRestarter::default();
    let (tx, handle) = start_runtime(restarter.clone());

    let mut last_sent = Instant::now();
    tx.send(file_changed(ChangeOps::WRITE)).await?;
    for ops in [
        ChangeOps::CREATE,
        ChangeOps::WRITE | ChangeOps::CHMOD,
        ChangeOps::RENAME,
        ChangeOps::REMOVE,
    ] {
        tokio::time::sleep(SETTLE / 5).await;
        last_sent = Instant::now();
        tx.send(file_changed(ops)).await?;
    }

    wait_until(|| restarter.count() >= 1).await;
    tokio::time::sleep(SETTLE * 2).await;

    let attempts = restarter.attempts();
    assert_eq!(attempts.len(), 1);
    // The quiet period is measured from the last change, not the first.
    assert!(attempts[0].at.duration_since(last_sent) >= SETTLE);

    shutdown(tx, handle).await?;
    Ok(())
}

#[tokio::test]
async fn failed_restart_keeps_supervising() -> TestResult {
    init_tracing();

    let restarter = RecordingRestarter::new(RestartOutcome::FailResolve);
    let (tx, handle) = start_runtime(restarter.clone());

    tx.send(file_changed(ChangeOps::WRITE)).await?;
    wait_until(|| restarter.count() == 1).await;

    restarter.set_outcome(RestartOutcome::FailExec);
    tx.send(file_changed(ChangeOps::CREATE)).await?;
    wait_until(|| restarter.count() == 2).await;

    assert!(!handle.is_finished());
    shutdown(tx, handle).await?;
    Ok(())
}

#[tokio::test]
async fn notifier_failure_stops_with_error() -> TestResult {
    init_tracing();

    let restarter = RecordingRestarter::default();
    let (tx, handle) = start_runtime(restarter.clone());

    tx.send(SupervisorEvent::NotifierFailed("queue overflow".into()))
        .await?;

    let result = timeout(Duration::from_secs(3), handle).await??;
    match result {
        Err(RelaunchError::NotifierError(msg)) => assert!(msg.contains("queue overflow")),
        other => panic!("expected NotifierError, got {other:?}"),
    }
    assert_eq!(restarter.count(), 0);
    Ok(())
}

#[tokio::test]
async fn scan_failure_stops_with_walk_error() -> TestResult {
    init_tracing();

    let restarter = RecordingRestarter::default();
    let (tx, handle) = start_runtime(restarter.clone());

    // A pending restart is abandoned when the scan fails.
    tx.send(file_changed(ChangeOps::WRITE)).await?;
    tx.send(SupervisorEvent::ScanFailed {
        path: "/work/src/private".into(),
        reason: "permission denied".into(),
    })
    .await?;

    let result = timeout(Duration::from_secs(3), handle).await??;
    match result {
        Err(RelaunchError::WalkError { path, .. }) => {
            assert_eq!(path.to_str(), Some("/work/src/private"))
        }
        other => panic!("expected WalkError, got {other:?}"),
    }
    assert_eq!(restarter.count(), 0);
    Ok(())
}

#[tokio::test]
async fn shutdown_request_ends_cleanly() -> TestResult {
    init_tracing();

    let (tx, handle) = start_runtime(RecordingRestarter::default());
    shutdown(tx, handle).await?;
    Ok(())
}
