// src/watch/notifier.rs

use std::fmt;
use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::types::{FileEvent, FileEventKind, WatchTarget};

/// Where notifiers deliver change events. The runtime loop is the only reader.
pub type EventSink = mpsc::UnboundedSender<RuntimeEvent>;

/// Capability to observe a directory and report changes.
///
/// Production code uses [`NotifyWatcher`]; tests inject a fake that emits
/// events on demand.
pub trait ChangeNotifier: Send {
    /// Begin delivering events for `target` into `sink`.
    ///
    /// Events may be sent from a different thread than the caller's.
    fn watch(&mut self, target: &WatchTarget, sink: EventSink) -> Result<()>;

    /// Stop delivering events. Calling this when not watching is a no-op.
    fn unwatch(&mut self);
}

/// [`ChangeNotifier`] backed by the platform's recommended `notify` watcher.
///
/// Dropping it (or calling `unwatch`) stops file watching.
#[derive(Default)]
pub struct NotifyWatcher {
    inner: Option<(RecommendedWatcher, PathBuf)>,
}

impl NotifyWatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for NotifyWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyWatcher")
            .field("root", &self.inner.as_ref().map(|(_, root)| root))
            .finish()
    }
}

impl ChangeNotifier for NotifyWatcher {
    fn watch(&mut self, target: &WatchTarget, sink: EventSink) -> Result<()> {
        self.unwatch();

        // Canonicalize once so we have a stable base path.
        let root = target
            .dir
            .canonicalize()
            .unwrap_or_else(|_| target.dir.clone());

        // Called synchronously on notify's own thread.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => forward_event(event, &sink),
                Err(err) => warn!(error = %err, "file watch error"),
            },
            Config::default(),
        )?;

        let mode = if target.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&root, mode)?;

        info!(root = ?root, recursive = target.recursive, "file watcher started");
        self.inner = Some((watcher, root));
        Ok(())
    }

    fn unwatch(&mut self) {
        if let Some((mut watcher, root)) = self.inner.take() {
            if let Err(err) = watcher.unwatch(&root) {
                debug!(root = ?root, error = %err, "unwatch failed; dropping watcher anyway");
            }
            info!(root = ?root, "file watcher stopped");
        }
    }
}

fn forward_event(event: Event, sink: &EventSink) {
    let kind = classify_kind(&event.kind);
    for path in event.paths {
        if sink
            .send(RuntimeEvent::FileChanged(FileEvent::new(path, kind)))
            .is_err()
        {
            // Runtime is gone; nothing left to notify.
            return;
        }
    }
}

/// Map a `notify` event kind onto the supervisor's coarse categories.
pub fn classify_kind(kind: &EventKind) -> FileEventKind {
    match kind {
        EventKind::Create(_) => FileEventKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) => FileEventKind::Moved,
        EventKind::Modify(_) => FileEventKind::Modified,
        EventKind::Remove(_) => FileEventKind::Deleted,
        _ => FileEventKind::Other,
    }
}
