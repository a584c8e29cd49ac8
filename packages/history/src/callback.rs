use crate::{ChangeListener, ChangeListeners, History, HistoryError};

type NavigateFn = Box<dyn Fn(&str) -> Result<(), HistoryError>>;
type GoFn = Box<dyn Fn(isize) -> Result<(), HistoryError>>;

/// A [`History`] provider assembled from closures.
///
/// This is the shortest way to plug the router into a host that already exposes its navigation
/// primitives as functions. Host-originated changes are forwarded with
/// [`CallbackHistory::dispatch_change`].
///
/// ```rust
/// # use std::{cell::RefCell, rc::Rc};
/// # use waypoint_history::{CallbackHistory, History};
/// let location = Rc::new(RefCell::new(String::from("/")));
///
/// let read = location.clone();
/// let write = location.clone();
/// let history = CallbackHistory::new(move || read.borrow().clone()).on_navigate(move |uri| {
///     *write.borrow_mut() = uri.to_string();
///     Ok(())
/// });
///
/// history.navigate_to("/about").unwrap();
/// assert_eq!(history.current_uri(), "/about");
/// ```
pub struct CallbackHistory {
    current_uri: Box<dyn Fn() -> String>,
    navigate_to: NavigateFn,
    go: GoFn,
    listeners: ChangeListeners,
}

impl CallbackHistory {
    /// Create a provider that reads the active URI from `current_uri`.
    ///
    /// Navigation and history moves are ignored until [`CallbackHistory::on_navigate`] and
    /// [`CallbackHistory::on_go`] are set.
    pub fn new(current_uri: impl Fn() -> String + 'static) -> Self {
        Self {
            current_uri: Box::new(current_uri),
            navigate_to: Box::new(|_| Ok(())),
            go: Box::new(|_| Ok(())),
            listeners: ChangeListeners::default(),
        }
    }

    /// The function called for [`History::navigate_to`].
    pub fn on_navigate(
        self,
        navigate_to: impl Fn(&str) -> Result<(), HistoryError> + 'static,
    ) -> Self {
        Self {
            navigate_to: Box::new(navigate_to),
            ..self
        }
    }

    /// The function called for [`History::go`].
    pub fn on_go(self, go: impl Fn(isize) -> Result<(), HistoryError> + 'static) -> Self {
        Self {
            go: Box::new(go),
            ..self
        }
    }

    /// Report a host-originated change to every subscribed listener.
    pub fn dispatch_change(&self, source: &str, target: &str) {
        self.listeners.dispatch(source, target);
    }

    /// The number of subscribed change listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl History for CallbackHistory {
    fn current_uri(&self) -> String {
        (self.current_uri)()
    }

    fn navigate_to(&self, uri: &str) -> Result<(), HistoryError> {
        (self.navigate_to)(uri)
    }

    fn go(&self, delta: isize) -> Result<(), HistoryError> {
        (self.go)(delta)
    }

    fn add_change_listener(&self, listener: ChangeListener) {
        self.listeners.add(listener);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[test]
    fn defaults_ignore_navigation() {
        let history = CallbackHistory::new(|| "/fixed".to_string());
        history.navigate_to("/elsewhere").unwrap();
        history.go(-3).unwrap();
        assert_eq!(history.current_uri(), "/fixed");
    }

    #[test]
    fn errors_come_back_unchanged() {
        let history = CallbackHistory::new(|| "/".to_string())
            .on_go(|_| Err(HistoryError::Unavailable("no window".to_string())));
        assert_eq!(
            history.go(1),
            Err(HistoryError::Unavailable("no window".to_string()))
        );
    }

    #[test]
    fn dispatch_reaches_every_listener() {
        let history = CallbackHistory::new(|| "/".to_string());
        let calls = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let calls = calls.clone();
            history.add_change_listener(Rc::new(move |_: &str, _: &str| {
                calls.set(calls.get() + 1)
            }));
        }

        history.dispatch_change("/a", "/b");
        assert_eq!(history.listener_count(), 3);
        assert_eq!(calls.get(), 3);
    }
}
