//! Drag subscriptions on the shared input surface.
//!
//! The input surface stands for the page-wide event target (the document in a
//! browser). A picker only receives move/up events while it holds a
//! [`DragSubscription`]; dropping the subscription detaches it, so every way
//! out of a drag (release, cancel, unmount) cleans up the same way.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::picker::PickerId;

#[derive(Debug, Default)]
struct Listeners {
    active: Vec<PickerId>,
}

/// The page-wide input surface, shared by every picker instance.
///
/// Cloning yields another handle to the same surface.
#[derive(Debug, Clone, Default)]
pub struct InputSurface {
    listeners: Rc<RefCell<Listeners>>,
}

impl InputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `owner` to the surface until the returned subscription is dropped.
    pub fn subscribe(&self, owner: PickerId) -> DragSubscription {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.active.contains(&owner) {
            listeners.active.push(owner);
        }
        log::debug!("Picker {} attached to input surface ({} active)", owner, listeners.active.len());

        DragSubscription {
            owner,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Whether `owner` currently receives move/up events.
    pub fn is_subscribed(&self, owner: PickerId) -> bool {
        self.listeners.borrow().active.contains(&owner)
    }

    /// Number of attached pickers.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().active.len()
    }

    /// Attached pickers, in attach order.
    pub fn subscribers(&self) -> Vec<PickerId> {
        self.listeners.borrow().active.clone()
    }
}

/// An active attachment to the [`InputSurface`]. Detaches on drop.
#[derive(Debug)]
pub struct DragSubscription {
    owner: PickerId,
    listeners: Weak<RefCell<Listeners>>,
}

impl DragSubscription {
    pub fn owner(&self) -> PickerId {
        self.owner
    }
}

impl Drop for DragSubscription {
    fn drop(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut listeners = listeners.borrow_mut();
        listeners.active.retain(|id| *id != self.owner);
        log::debug!("Picker {} detached from input surface ({} active)", self.owner, listeners.active.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_subscribe_and_drop() {
        let surface = InputSurface::new();
        let id = Uuid::new_v4();

        let subscription = surface.subscribe(id);
        assert!(surface.is_subscribed(id));
        assert_eq!(subscription.owner(), id);
        assert_eq!(surface.listener_count(), 1);

        drop(subscription);
        assert!(!surface.is_subscribed(id));
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn test_instances_are_independent() {
        let surface = InputSurface::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let sub_a = surface.subscribe(a);
        let sub_b = surface.subscribe(b);
        assert_eq!(surface.subscribers(), vec![a, b]);

        drop(sub_a);
        assert_eq!(surface.subscribers(), vec![b]);
        drop(sub_b);
        assert!(surface.subscribers().is_empty());
    }

    #[test]
    fn test_clones_share_listeners() {
        let surface = InputSurface::new();
        let other = surface.clone();
        let id = Uuid::new_v4();

        let _subscription = surface.subscribe(id);
        assert!(other.is_subscribed(id));
    }

    #[test]
    fn test_subscription_outliving_surface() {
        let surface = InputSurface::new();
        let subscription = surface.subscribe(Uuid::new_v4());
        drop(surface);
        drop(subscription);
    }
}
