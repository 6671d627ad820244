#![allow(dead_code)]

pub use watchrun_test_utils::{
    builders, fake_launcher, fake_notifier, fake_supervisor, init_tracing, with_timeout,
    ChildBehaviour, FakeLauncher, FakeNotifier, SupervisorConfigBuilder,
};

use tokio::sync::mpsc;
use watchrun::engine::RuntimeEvent;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A fresh runtime channel.
pub fn channel() -> (
    mpsc::UnboundedSender<RuntimeEvent>,
    mpsc::UnboundedReceiver<RuntimeEvent>,
) {
    mpsc::unbounded_channel()
}
