// sequor_core/src/signal.rs

//! A small publish/subscribe channel used for step status events and for
//! fire-and-forget transition side-effect broadcasts.
//!
//! Observers are plain closures behind `Arc`; subscriptions are keyed by a
//! monotonically increasing token so collaborators can detach again when a
//! step leaves `Started`.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{event, Level};

/// Token returned by [`Signal::subscribe`]; pass it back to
/// [`Signal::unsubscribe`] to detach the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

/// A broadcast channel with an interior observer list.
///
/// `emit` clones the observer list out of the lock before invoking any
/// callback, so observers may freely subscribe, unsubscribe, or re-emit
/// without deadlocking.
pub struct Signal<T> {
  observers: RwLock<Vec<(SubscriptionId, Observer<T>)>>,
  next_id: AtomicU64,
}

impl<T> Signal<T> {
  pub fn new() -> Self {
    Self {
      observers: RwLock::new(Vec::new()),
      next_id: AtomicU64::new(0),
    }
  }

  /// Attaches an observer; returns the token needed to detach it again.
  pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
    let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
    self.observers.write().push((id, Arc::new(observer)));
    id
  }

  /// Detaches a previously subscribed observer. Detaching twice is a no-op.
  pub fn unsubscribe(&self, id: SubscriptionId) {
    self.observers.write().retain(|(sub_id, _)| *sub_id != id);
  }

  /// Number of currently attached observers.
  pub fn observer_count(&self) -> usize {
    self.observers.read().len()
  }

  /// Broadcasts `value` to every observer attached at the time of the call.
  pub fn emit(&self, value: &T) {
    let snapshot: Vec<Observer<T>> = self.observers.read().iter().map(|(_, obs)| obs.clone()).collect();
    if snapshot.is_empty() {
      return;
    }
    event!(Level::TRACE, observers = snapshot.len(), "Emitting signal.");
    for observer in snapshot {
      observer(value);
    }
  }
}

impl<T> Default for Signal<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> std::fmt::Debug for Signal<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Signal")
      .field("observers", &self.observers.read().len())
      .finish()
  }
}
