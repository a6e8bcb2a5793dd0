//! Gesture-scoped document listeners.
//!
//! A gesture that must keep receiving pointer moves and releases after the
//! pointer leaves the canvas takes a [`ListenerGuard`] when it starts. The
//! guard is the registration: document-level events are only delivered while
//! at least one guard is alive, and dropping the guard deregisters it. A
//! gesture state that owns its guard therefore cannot outlive its listener or
//! leak one.

use std::cell::Cell;
use std::rc::Rc;

/// Registry of live document pointer listeners.
#[derive(Debug, Clone, Default)]
pub struct DocumentListeners {
    active: Rc<Cell<usize>>,
}

impl DocumentListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the lifetime of the returned guard.
    pub fn acquire(&self) -> ListenerGuard {
        self.active.set(self.active.get() + 1);
        ListenerGuard {
            active: Rc::clone(&self.active),
        }
    }

    /// Number of listeners currently registered.
    pub fn active(&self) -> usize {
        self.active.get()
    }

    pub fn is_listening(&self) -> bool {
        self.active() > 0
    }
}

/// A registered document listener. Deregisters on drop.
#[derive(Debug)]
#[must_use = "the listener is removed as soon as the guard is dropped"]
pub struct ListenerGuard {
    active: Rc<Cell<usize>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_register_and_deregister() {
        let listeners = DocumentListeners::new();
        assert!(!listeners.is_listening());

        let first = listeners.acquire();
        let second = listeners.acquire();
        assert_eq!(listeners.active(), 2);

        drop(first);
        assert_eq!(listeners.active(), 1);
        drop(second);
        assert!(!listeners.is_listening());
    }

    #[test]
    fn clones_share_one_registry() {
        let listeners = DocumentListeners::new();
        let shared = listeners.clone();
        let _guard = shared.acquire();
        assert_eq!(listeners.active(), 1);
    }
}
