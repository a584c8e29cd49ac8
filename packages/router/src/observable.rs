use std::{fmt, rc::Rc};

use crate::ListenerError;

/// A callback receiving `(previous, current)` whenever an [`Observable`] is overwritten.
pub type Listener<V> = Rc<dyn Fn(Option<&V>, Option<&V>) -> Result<(), ListenerError>>;

/// Identifies a subscription so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A single, possibly absent value plus the listeners that want to hear about every write.
///
/// Writes notify listeners synchronously, in subscription order. A listener that fails stops the
/// delivery; the listeners after it don't see that write.
///
/// ```rust
/// # use std::{cell::RefCell, rc::Rc};
/// # use waypoint_router::Observable;
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut current = Observable::new(None);
///
/// let sink = seen.clone();
/// current.subscribe(move |previous: Option<&u32>, next: Option<&u32>| {
///     sink.borrow_mut().push((previous.copied(), next.copied()));
///     Ok(())
/// });
///
/// current.set(Some(1)).unwrap();
/// current.set(Some(2)).unwrap();
/// assert_eq!(*seen.borrow(), vec![(None, Some(1)), (Some(1), Some(2))]);
/// ```
pub struct Observable<V> {
    value: Option<V>,
    listeners: Vec<(ListenerId, Listener<V>)>,
    next_id: u64,
}

impl<V> Default for Observable<V> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<V: fmt::Debug> fmt::Debug for Observable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<V> Observable<V> {
    /// Create an observable holding `value`. Nobody is notified of the initial value.
    pub fn new(value: Option<V>) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// The current value.
    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Subscribe to writes.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(Option<&V>, Option<&V>) -> Result<(), ListenerError> + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// The number of subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<V: Clone> Observable<V> {
    /// Overwrite the value and notify every listener before returning.
    pub fn set(&mut self, value: Option<V>) -> Result<(), ListenerError> {
        self.replace(value).notify()
    }

    /// Overwrite the value and hand back the pending notification.
    ///
    /// Use this when the observable lives behind a borrow that has to be released before
    /// listeners run, then call [`Change::notify`].
    pub fn replace(&mut self, value: Option<V>) -> Change<V> {
        let current = value.clone();
        let previous = std::mem::replace(&mut self.value, value);
        Change {
            previous,
            current,
            listeners: self.listeners.iter().map(|(_, l)| l.clone()).collect(),
        }
    }
}

/// A write to an [`Observable`] whose listeners have not been called yet.
#[must_use = "listeners are only called by `Change::notify`"]
pub struct Change<V> {
    previous: Option<V>,
    current: Option<V>,
    listeners: Vec<Listener<V>>,
}

impl<V> Change<V> {
    /// The value before the write.
    pub fn previous(&self) -> Option<&V> {
        self.previous.as_ref()
    }

    /// The value written.
    pub fn current(&self) -> Option<&V> {
        self.current.as_ref()
    }

    /// Call the listeners that were subscribed when the write happened.
    pub fn notify(self) -> Result<(), ListenerError> {
        for listener in &self.listeners {
            listener(self.previous.as_ref(), self.current.as_ref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[test]
    fn unsubscribed_listeners_are_not_called() {
        let calls = Rc::new(Cell::new(0));
        let mut value = Observable::default();

        let counter = calls.clone();
        let id = value.subscribe(move |_: Option<&&str>, _: Option<&&str>| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        value.set(Some("a")).unwrap();
        assert!(value.unsubscribe(id));
        assert!(!value.unsubscribe(id));
        value.set(Some("b")).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(value.get(), Some(&"b"));
        assert_eq!(value.listener_count(), 0);
    }

    #[test]
    fn failing_listener_stops_delivery() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut value = Observable::new(Some(0));

        let first = order.clone();
        value.subscribe(move |_: Option<&i32>, _: Option<&i32>| {
            first.borrow_mut().push("first");
            Err("rejected".into())
        });
        let second = order.clone();
        value.subscribe(move |_: Option<&i32>, _: Option<&i32>| {
            second.borrow_mut().push("second");
            Ok(())
        });

        let err = value.set(Some(1)).unwrap_err();
        assert_eq!(err.to_string(), "rejected");
        assert_eq!(*order.borrow(), vec!["first"]);
        // the write itself happened
        assert_eq!(value.get(), Some(&1));
    }

    #[test]
    fn replace_defers_notification() {
        let calls = Rc::new(Cell::new(0));
        let mut value = Observable::new(None);
        let counter = calls.clone();
        value.subscribe(move |_: Option<&u8>, _: Option<&u8>| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        let change = value.replace(Some(3));
        assert_eq!(calls.get(), 0);
        assert_eq!(change.previous(), None);
        assert_eq!(change.current(), Some(&3));
        change.notify().unwrap();
        assert_eq!(calls.get(), 1);
    }
}
