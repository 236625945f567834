// ============================================================================
// REACTIVITY - Subscriber notification system
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Box<dyn Fn()>;

/// Reactive value with change notification
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: RefCell<Vec<Callback>>,
}

impl<T> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Shared handle to the inner value
    pub fn get(&self) -> Rc<RefCell<T>> {
        self.value.clone()
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Mutate the value in place and notify subscribers
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut *self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Box::new(callback));
    }

    fn notify(&self) {
        for callback in self.subscribers.borrow().iter() {
            callback();
        }
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            // Clones share the value but keep their own subscriber list
            subscribers: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_notifies_subscribers() {
        let state = ReactiveState::new(0u32);
        let fired = Rc::new(Cell::new(0u32));
        let fired_clone = fired.clone();
        state.subscribe(move || fired_clone.set(fired_clone.get() + 1));
        state.set(1);
        state.update(|v| *v += 1);
        assert_eq!(fired.get(), 2);
        assert_eq!(*state.get().borrow(), 2);
    }

    #[test]
    fn clones_share_value_not_subscribers() {
        let state = ReactiveState::new(String::from("a"));
        let clone = state.clone();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        state.subscribe(move || fired_clone.set(true));
        clone.set(String::from("b"));
        assert_eq!(*state.get().borrow(), "b");
        // The clone's set only notifies the clone's (empty) subscriber list
        assert!(!fired.get());
    }
}
