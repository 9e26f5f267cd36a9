use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;

/// Back/forward traversal notification carrying the newly-current entry's
/// opaque state, `None` when the entry never had one.
#[derive(Debug, Clone, PartialEq)]
pub struct PopEvent {
    pub state: Option<Value>,
}

type Listener = Rc<dyn Fn(&PopEvent)>;

#[derive(Default)]
struct BridgeInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Single subscription point for the host's back/forward event, fanned out
/// to listeners in subscription order. Cloning shares the listener table; a
/// `detached` bridge hands back inert subscriptions.
#[derive(Clone)]
pub struct NavigationBridge {
    inner: Option<Rc<RefCell<BridgeInner>>>,
}

impl NavigationBridge {
    pub fn new() -> Self {
        Self {
            inner: Some(Rc::new(RefCell::new(BridgeInner::default()))),
        }
    }

    pub fn detached() -> Self {
        Self { inner: None }
    }

    pub fn subscribe(&self, listener: impl Fn(&PopEvent) + 'static) -> Subscription {
        let Some(inner) = &self.inner else {
            return Subscription {
                inner: Weak::new(),
                id: 0,
            };
        };

        let mut guard = inner.borrow_mut();
        let id = guard.next_id;
        guard.next_id += 1;
        guard.listeners.push((id, Rc::new(listener)));

        Subscription {
            inner: Rc::downgrade(inner),
            id,
        }
    }

    pub fn emit(&self, event: &PopEvent) {
        let Some(inner) = &self.inner else {
            return;
        };

        // Snapshot before invoking so a listener may subscribe or
        // unsubscribe re-entrantly without poisoning the borrow.
        let snapshot: Vec<Listener> = inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        match &self.inner {
            Some(inner) => inner.borrow().listeners.len(),
            None => 0,
        }
    }
}

impl Default for NavigationBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one bridge listener; dropping it removes the listener.
pub struct Subscription {
    inner: Weak<RefCell<BridgeInner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    fn release(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
