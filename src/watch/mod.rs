// src/watch/mod.rs

//! File watching and change filtering.
//!
//! This module is responsible for:
//! - The [`ChangeNotifier`] capability the supervisor is constructed with.
//! - A cross-platform implementation of it on top of `notify`.
//! - Deciding which filesystem events count as a reason to restart.
//!
//! It knows nothing about child processes; it only turns filesystem changes
//! into [`RuntimeEvent::FileChanged`](crate::engine::RuntimeEvent) messages.

pub mod filter;
pub mod notifier;
pub mod path_utils;

pub use filter::EventFilter;
pub use notifier::{classify_kind, ChangeNotifier, EventSink, NotifyWatcher};
