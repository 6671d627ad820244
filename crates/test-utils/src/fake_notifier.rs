use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use watchrun::engine::RuntimeEvent;
use watchrun::errors::Result;
use watchrun::types::{FileEvent, FileEventKind, WatchTarget};
use watchrun::watch::{ChangeNotifier, EventSink};

#[derive(Debug, Default)]
struct NotifierState {
    sink: Option<EventSink>,
    watched: Vec<WatchTarget>,
    unwatch_calls: usize,
}

/// A notifier driven by the test instead of the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FakeNotifier {
    state: Arc<Mutex<NotifierState>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event as if the filesystem had reported it.
    ///
    /// Returns `false` if nothing is listening (not watching, or the runtime
    /// is gone).
    pub fn emit(&self, event: FileEvent) -> bool {
        let state = self.state.lock().unwrap();
        match state.sink {
            Some(ref sink) => sink.send(RuntimeEvent::FileChanged(event)).is_ok(),
            None => false,
        }
    }

    pub fn emit_modified(&self, path: impl Into<PathBuf>) -> bool {
        self.emit(FileEvent::new(path, FileEventKind::Modified))
    }

    pub fn is_watching(&self) -> bool {
        self.state.lock().unwrap().sink.is_some()
    }

    pub fn watched_targets(&self) -> Vec<WatchTarget> {
        self.state.lock().unwrap().watched.clone()
    }

    pub fn unwatch_calls(&self) -> usize {
        self.state.lock().unwrap().unwatch_calls
    }
}

impl ChangeNotifier for FakeNotifier {
    fn watch(&mut self, target: &WatchTarget, sink: EventSink) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.watched.push(target.clone());
        state.sink = Some(sink);
        Ok(())
    }

    fn unwatch(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.sink = None;
        state.unwatch_calls += 1;
    }
}
