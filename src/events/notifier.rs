//! # Notifier: synchronous fan-out over registered listeners.
//!
//! [`Notifier`] maps each [`EventKind`] to an ordered list of listeners.
//! `emit` delivers an event to every listener registered for its kind, in
//! registration order, on the calling task.
//!
//! ## Rules
//! - The listener list is **snapshotted** before delivery; listeners may
//!   subscribe/unsubscribe from inside a callback without affecting the
//!   in-progress fan-out.
//! - A panicking listener is caught and logged; delivery continues with the
//!   next listener.
//! - The same listener may be registered more than once and is then invoked
//!   once per registration.
//!
//! ```text
//!    emit(&Event)
//!        │   snapshot listeners[kind]
//!        ├──► L1(&Event)
//!        ├──► L2(&Event)   (panic → warn!, continue)
//!        └──► LN(&Event)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;

use super::event::{Event, EventKind};
use crate::error::panic_message;

/// Shared handle to a listener callback.
///
/// Keep a clone of the `Arc` to [`unsubscribe`](Notifier::unsubscribe) later;
/// identity is pointer equality.
pub type Listener<R, E> = Arc<dyn Fn(&Event<R, E>) + Send + Sync>;

/// Registry of listeners keyed by event kind.
pub struct Notifier<R, E> {
    listeners: Mutex<HashMap<EventKind, Vec<Listener<R, E>>>>,
}

impl<R, E> Notifier<R, E> {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `listener` for events of `kind`.
    pub fn subscribe(&self, kind: EventKind, listener: Listener<R, E>) {
        self.listeners.lock().entry(kind).or_default().push(listener);
    }

    /// Removes every registration of `listener` under `kind`.
    ///
    /// Returns `true` if anything was removed.
    pub fn unsubscribe(&self, kind: EventKind, listener: &Listener<R, E>) -> bool {
        let mut map = self.listeners.lock();
        let Some(list) = map.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| !Arc::ptr_eq(l, listener));
        let removed = list.len() != before;
        if list.is_empty() {
            map.remove(&kind);
        }
        removed
    }

    /// Delivers `event` to every listener registered for its kind.
    pub fn emit(&self, event: &Event<R, E>) {
        let kind = event.kind();
        let snapshot: Vec<Listener<R, E>> = match self.listeners.lock().get(&kind) {
            Some(list) => list.clone(),
            None => return,
        };

        for listener in snapshot {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(event))) {
                tracing::warn!(
                    event = kind.as_label(),
                    panic = %panic_message(payload.as_ref()),
                    "listener panicked; continuing with the next one"
                );
            }
        }
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn len(&self, kind: EventKind) -> usize {
        self.listeners.lock().get(&kind).map_or(0, Vec::len)
    }

    /// True if no listener is registered for any kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().values().all(Vec::is_empty)
    }
}

impl<R, E> Default for Notifier<R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, E> fmt::Debug for Notifier<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.listeners.lock();
        let mut dbg = f.debug_map();
        for kind in EventKind::ALL {
            if let Some(list) = map.get(&kind) {
                dbg.entry(&kind.as_label(), &list.len());
            }
        }
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Status;

    type Seen = Arc<Mutex<Vec<&'static str>>>;

    fn tagged(seen: &Seen, tag: &'static str) -> Listener<u32, String> {
        let seen = Arc::clone(seen);
        Arc::new(move |_ev: &Event<u32, String>| seen.lock().push(tag))
    }

    fn exploding(_ev: &Event<u32, String>) {
        panic!("listener boom");
    }

    fn poll(n: u32) -> Event<u32, String> {
        Event::Poll {
            result: n,
            status: Status::Polling,
        }
    }

    #[test]
    fn test_emit_in_registration_order() {
        let notifier = Notifier::new();
        let seen: Seen = Arc::default();
        notifier.subscribe(EventKind::Poll, tagged(&seen, "a"));
        notifier.subscribe(EventKind::Poll, tagged(&seen, "b"));
        notifier.subscribe(EventKind::End, tagged(&seen, "end"));

        notifier.emit(&poll(1));
        assert_eq!(*seen.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let notifier: Notifier<u32, String> = Notifier::new();
        notifier.emit(&poll(1));
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_duplicate_subscription_invoked_twice() {
        let notifier = Notifier::new();
        let seen: Seen = Arc::default();
        let listener = tagged(&seen, "dup");
        notifier.subscribe(EventKind::Poll, Arc::clone(&listener));
        notifier.subscribe(EventKind::Poll, Arc::clone(&listener));
        assert_eq!(notifier.len(EventKind::Poll), 2);

        notifier.emit(&poll(1));
        assert_eq!(*seen.lock(), vec!["dup", "dup"]);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let notifier = Notifier::new();
        let seen: Seen = Arc::default();
        let keep = tagged(&seen, "keep");
        let drop_me = tagged(&seen, "drop");
        notifier.subscribe(EventKind::Poll, Arc::clone(&keep));
        notifier.subscribe(EventKind::Poll, Arc::clone(&drop_me));

        assert!(notifier.unsubscribe(EventKind::Poll, &drop_me));
        assert!(!notifier.unsubscribe(EventKind::Poll, &drop_me));
        assert!(!notifier.unsubscribe(EventKind::End, &keep));

        notifier.emit(&poll(1));
        assert_eq!(*seen.lock(), vec!["keep"]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let notifier = Notifier::new();
        let seen: Seen = Arc::default();
        notifier.subscribe(EventKind::Poll, tagged(&seen, "before"));
        notifier.subscribe(EventKind::Poll, Arc::new(exploding));
        notifier.subscribe(EventKind::Poll, tagged(&seen, "after"));

        notifier.emit(&poll(1));
        notifier.emit(&poll(2));
        assert_eq!(*seen.lock(), vec!["before", "after", "before", "after"]);
    }

    #[test]
    fn test_subscribe_during_emit_applies_to_next_emit() {
        let notifier: Arc<Notifier<u32, String>> = Arc::new(Notifier::new());
        let seen: Seen = Arc::default();

        let late = tagged(&seen, "late");
        let registrar = {
            let notifier = Arc::downgrade(&notifier);
            let seen = Arc::clone(&seen);
            Arc::new(move |_ev: &Event<u32, String>| {
                seen.lock().push("registrar");
                if let Some(n) = notifier.upgrade() {
                    n.subscribe(EventKind::Poll, Arc::clone(&late));
                }
            })
        };
        notifier.subscribe(EventKind::Poll, registrar);

        notifier.emit(&poll(1));
        assert_eq!(*seen.lock(), vec!["registrar"]);

        seen.lock().clear();
        notifier.emit(&poll(2));
        assert_eq!(*seen.lock(), vec!["registrar", "late"]);
    }
}
