//! Pointer event dispatch with scoped subscriptions

use ratatui::layout::{Position, Rect};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, info};

use crate::state::events::StateEvent;

/// Trait for components that react to pointer-down events anywhere on screen
pub trait PointerSubscriber {
    /// Handle a pointer press at terminal cell (`column`, `row`)
    fn on_pointer_down(&mut self, column: u16, row: u16) -> Option<StateEvent>;

    /// Get subscriber name for debugging
    fn name(&self) -> &str;
}

type SubscriberList = RefCell<Vec<(u64, Box<dyn PointerSubscriber>)>>;

/// Fans pointer-down events out to the current subscribers and collects the
/// state events they produce
pub struct PointerDispatcher {
    subscribers: Rc<SubscriberList>,
    next_id: Cell<u64>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Register a subscriber for as long as the returned guard lives
    #[must_use = "dropping the subscription unregisters the subscriber"]
    pub fn subscribe(&self, subscriber: Box<dyn PointerSubscriber>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        info!(target: "dispatcher", "Adding pointer subscriber: {}", subscriber.name());
        self.subscribers.borrow_mut().push((id, subscriber));
        Subscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn pointer_down(&self, column: u16, row: u16) -> Vec<StateEvent> {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers
            .iter_mut()
            .filter_map(|(_, subscriber)| {
                let event = subscriber.on_pointer_down(column, row);
                if let Some(event) = &event {
                    debug!(target: "dispatcher", "{} produced {}", subscriber.name(), event.name());
                }
                event
            })
            .collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl Default for PointerDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for a registered subscriber; unregisters it when dropped
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberList>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
            debug!(target: "dispatcher", "Removed pointer subscriber {}", self.id);
        }
    }
}

/// Dismisses the category dropdown when the pointer goes down outside of it.
///
/// The renderer publishes the dropdown's screen area (button plus open menu)
/// into the shared cell every frame.
pub struct OutsideClickSubscriber {
    region: Rc<Cell<Option<Rect>>>,
}

impl OutsideClickSubscriber {
    pub fn new(region: Rc<Cell<Option<Rect>>>) -> Self {
        Self { region }
    }
}

impl PointerSubscriber for OutsideClickSubscriber {
    fn on_pointer_down(&mut self, column: u16, row: u16) -> Option<StateEvent> {
        let region = self.region.get()?;
        if region.contains(Position::new(column, row)) {
            None
        } else {
            Some(StateEvent::DropdownDismissed)
        }
    }

    fn name(&self) -> &str {
        "OutsideClick"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_drop_unregisters() {
        let dispatcher = PointerDispatcher::new();
        let region = Rc::new(Cell::new(Some(Rect::new(0, 0, 10, 3))));

        let subscription = dispatcher.subscribe(Box::new(OutsideClickSubscriber::new(region)));
        assert_eq!(dispatcher.subscriber_count(), 1);
        assert_eq!(dispatcher.pointer_down(20, 20), vec![StateEvent::DropdownDismissed]);

        drop(subscription);
        assert_eq!(dispatcher.subscriber_count(), 0);
        assert!(dispatcher.pointer_down(20, 20).is_empty());
    }

    #[test]
    fn test_click_inside_region_keeps_dropdown() {
        let dispatcher = PointerDispatcher::new();
        let region = Rc::new(Cell::new(Some(Rect::new(2, 1, 10, 5))));
        let _subscription =
            dispatcher.subscribe(Box::new(OutsideClickSubscriber::new(region.clone())));

        assert!(dispatcher.pointer_down(5, 3).is_empty());

        region.set(None);
        assert!(dispatcher.pointer_down(50, 30).is_empty());
    }

    #[test]
    fn test_subscription_outliving_dispatcher_is_harmless() {
        let dispatcher = PointerDispatcher::new();
        let subscription = dispatcher.subscribe(Box::new(OutsideClickSubscriber::new(Rc::new(
            Cell::new(None),
        ))));
        drop(dispatcher);
        drop(subscription);
    }
}
