// tests/runtime_fake_launcher.rs

mod common;
use crate::common::{
    channel, fake_supervisor, init_tracing, ChildBehaviour, SupervisorConfigBuilder, TestResult,
};

use std::time::Duration;

use tempfile::tempdir;
use tokio::time::{sleep, timeout};
use watchrun::engine::{Runtime, RuntimeEvent};
use watchrun::errors::SupervisorError;
use watchrun::watch::ChangeNotifier;

/// Poll `cond` until it holds or a second passes.
async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    cond()
}

#[tokio::test]
async fn runtime_restarts_on_qualifying_changes_and_stops_on_shutdown() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = SupervisorConfigBuilder::new(dir.path()).build();
    let (mut sup, launcher, notifier) = fake_supervisor(cfg);
    let (tx, rx) = channel();
    sup.start(tx.clone())?;

    let handle = tokio::spawn(Runtime::new(sup, rx).run());

    assert!(notifier.emit_modified(dir.path().join("app.py")));
    assert!(notifier.emit_modified(dir.path().join("notes.txt")));
    assert!(notifier.emit_modified(dir.path().join("pkg/mod.py")));

    assert!(eventually(|| launcher.spawn_count() == 3).await);

    tx.send(RuntimeEvent::ShutdownRequested)?;
    let result = timeout(Duration::from_secs(3), handle).await??;
    result?;

    assert_eq!(launcher.live_count(), 0);
    assert_eq!(launcher.max_live(), 1);
    assert_eq!(launcher.spawn_count(), 3);
    assert!(!notifier.is_watching());
    Ok(())
}

#[tokio::test]
async fn runtime_survives_spawn_failures() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = SupervisorConfigBuilder::new(dir.path()).build();
    let (mut sup, launcher, notifier) = fake_supervisor(cfg);
    let (tx, rx) = channel();
    sup.start(tx.clone())?;
    launcher.fail_next_spawns(1);

    let handle = tokio::spawn(Runtime::new(sup, rx).run());

    notifier.emit_modified(dir.path().join("a.py"));
    assert!(eventually(|| launcher.commands().len() == 2).await);
    assert_eq!(launcher.live_count(), 0);

    notifier.emit_modified(dir.path().join("a.py"));
    assert!(eventually(|| launcher.live_count() == 1).await);

    tx.send(RuntimeEvent::ShutdownRequested)?;
    timeout(Duration::from_secs(3), handle).await???;

    assert_eq!(launcher.live_count(), 0);
    Ok(())
}

#[tokio::test]
async fn debounce_coalesces_a_burst_into_one_restart() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = SupervisorConfigBuilder::new(dir.path())
        .debounce(Duration::from_millis(150))
        .build();
    let (mut sup, launcher, notifier) = fake_supervisor(cfg);
    let (tx, rx) = channel();
    sup.start(tx.clone())?;

    let handle = tokio::spawn(Runtime::new(sup, rx).run());

    for _ in 0..5 {
        notifier.emit_modified(dir.path().join("a.py"));
    }

    assert!(eventually(|| launcher.spawn_count() == 2).await);
    sleep(Duration::from_millis(300)).await;
    assert_eq!(launcher.spawn_count(), 2);

    tx.send(RuntimeEvent::ShutdownRequested)?;
    timeout(Duration::from_secs(3), handle).await???;
    assert_eq!(launcher.live_count(), 0);
    Ok(())
}

#[tokio::test]
async fn shutdown_during_debounce_skips_the_restart() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = SupervisorConfigBuilder::new(dir.path())
        .debounce(Duration::from_secs(10))
        .build();
    let (mut sup, launcher, notifier) = fake_supervisor(cfg);
    let (tx, rx) = channel();
    sup.start(tx.clone())?;

    notifier.emit_modified(dir.path().join("a.py"));
    tx.send(RuntimeEvent::ShutdownRequested)?;

    timeout(Duration::from_secs(3), Runtime::new(sup, rx).run()).await??;

    assert_eq!(launcher.spawn_count(), 1);
    assert_eq!(launcher.live_count(), 0);
    Ok(())
}

#[tokio::test]
async fn closed_channel_stops_the_supervisor() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = SupervisorConfigBuilder::new(dir.path()).build();
    let (mut sup, launcher, notifier) = fake_supervisor(cfg);
    let (tx, rx) = channel();
    sup.start(tx)?;

    // The fake notifier holds the last sender; stopping its sink closes the channel.
    let runtime = Runtime::new(sup, rx);
    let mut notifier_handle = notifier.clone();
    notifier_handle.unwatch();

    timeout(Duration::from_secs(3), runtime.run()).await??;

    assert_eq!(launcher.live_count(), 0);
    Ok(())
}

#[tokio::test]
async fn termination_timeout_is_fatal_for_the_runtime() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = SupervisorConfigBuilder::new(dir.path())
        .stop_timeout(Duration::from_millis(20))
        .build();
    let (mut sup, launcher, notifier) = fake_supervisor(cfg);
    let (tx, rx) = channel();
    launcher.set_child_behaviour(ChildBehaviour::Unkillable);
    sup.start(tx.clone())?;

    notifier.emit_modified(dir.path().join("a.py"));

    let result = timeout(Duration::from_secs(10), Runtime::new(sup, rx).run()).await?;

    assert!(matches!(result, Err(SupervisorError::TerminationTimeout { .. })));
    assert_eq!(launcher.spawn_count(), 1);
    assert_eq!(launcher.max_live(), 1);
    Ok(())
}
