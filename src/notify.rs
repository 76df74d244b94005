//! Change-event fan-out from the store to its consumers.
//!
//! Events are delivered synchronously, in subscription order, on the same
//! call that performed the mutation. The listener set is snapshotted before
//! each fan-out, so a handler may subscribe or unsubscribe (including
//! itself) without poisoning the iteration.

use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Subject,
    Assignment,
    Exam,
    Grade,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::Subject, Self::Assignment, Self::Exam, Self::Grade];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Assignment => "assignment",
            Self::Exam => "exam",
            Self::Grade => "grade",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Update,
    Delete,
    Clear,
    Reload,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Clear => "clear",
            Self::Reload => "reload",
        }
    }
}

/// What changed. `id` is the affected entity id, or [`ChangeEvent::ALL`] for
/// collection-wide changes (clear, reload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub entity: EntityKind,
    pub change: ChangeKind,
    pub id: i32,
}

impl ChangeEvent {
    /// Sentinel id for events that affect a whole collection.
    pub const ALL: i32 = -1;

    pub fn new(entity: EntityKind, change: ChangeKind, id: i32) -> Self {
        Self { entity, change, id }
    }
}

pub type ListenerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// One subscription channel for all entity kinds; consumers match on the
/// event instead of implementing a partial interface.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, event: ChangeEvent) -> ListenerResult;
}

/// Publish/subscribe hub owned by the store.
///
/// Registration is idempotent by listener identity (`Arc` pointer), and
/// unsubscribing an unknown listener is a no-op. A handler that returns an
/// error is logged and skipped; it never stops delivery to later listeners
/// or fails the mutation that triggered the event.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Mutex<Vec<Arc<dyn ChangeListener>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    // The listener list stays usable even if a lock holder panicked; a
    // poisoned list is just the last list.
    fn listeners(&self) -> MutexGuard<'_, Vec<Arc<dyn ChangeListener>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, listener: Arc<dyn ChangeListener>) {
        let mut listeners = self.listeners();
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return;
        }
        listeners.push(listener);
    }

    pub fn unsubscribe(&self, listener: &Arc<dyn ChangeListener>) {
        self.listeners().retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    pub fn publish(&self, event: ChangeEvent) {
        // Snapshot first so handlers can re-enter subscribe/unsubscribe.
        let snapshot: Vec<Arc<dyn ChangeListener>> = self.listeners().clone();
        for listener in snapshot {
            if let Err(err) = listener.on_change(event) {
                log::warn!(
                    "change listener failed on {} {} (id {}): {err}",
                    event.entity.as_str(),
                    event.change.as_str(),
                    event.id
                );
            }
        }
    }
}
