#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use std::{cell::RefCell, rc::Rc};

mod callback;
pub use callback::*;

mod memory;
pub use memory::*;

/// A callback invoked with `(source, target)` whenever a [`History`] changes its active URI.
pub type ChangeListener = Rc<dyn Fn(&str, &str)>;

/// An error reported by a [`History`] provider when it cannot carry out a navigation.
///
/// The router never catches these. They reach the caller of the navigation that triggered them,
/// after the router has already committed its own state.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The provider refused to navigate to the URI.
    #[error("cannot navigate to {uri:?}: {reason}")]
    Rejected {
        /// The URI that was refused.
        uri: String,
        /// Why the provider refused it.
        reason: String,
    },

    /// The underlying navigation mechanism is not reachable.
    #[error("history provider unavailable: {0}")]
    Unavailable(String),
}

/// An integration with some kind of navigation history.
///
/// The described behaviors mimic a web browser. A provider may deviate from them, as long as
/// [`History::current_uri`] always reports what the host considers active right now.
///
/// Providers are used from a single thread and take `&self`. Implementations keep their mutable
/// state behind interior mutability, like [`MemoryHistory`] does.
pub trait History {
    /// Get the URI the host currently considers active, path and query included.
    ///
    /// ```rust
    /// # use waypoint_history::{History, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/inbox?page=2");
    /// assert_eq!(history.current_uri(), "/inbox?page=2");
    /// ```
    #[must_use]
    fn current_uri(&self) -> String;

    /// Make `uri` the active URI, recording a new history entry.
    ///
    /// From the router's point of view this is fire-and-forget. A host may defer the actual side
    /// effect.
    fn navigate_to(&self, uri: &str) -> Result<(), HistoryError>;

    /// Move `delta` steps through the native history. Negative values go back.
    ///
    /// Providers should treat moves past either end of their history the way a browser does:
    /// clamp or ignore them rather than fail.
    fn go(&self, delta: isize) -> Result<(), HistoryError>;

    /// Subscribe to changes of the active URI.
    ///
    /// Providers must call every listener for every transition of the native mechanism,
    /// including the ones not initiated through the router.
    fn add_change_listener(&self, listener: ChangeListener);
}

impl<H: History + ?Sized> History for Rc<H> {
    fn current_uri(&self) -> String {
        (**self).current_uri()
    }

    fn navigate_to(&self, uri: &str) -> Result<(), HistoryError> {
        (**self).navigate_to(uri)
    }

    fn go(&self, delta: isize) -> Result<(), HistoryError> {
        (**self).go(delta)
    }

    fn add_change_listener(&self, listener: ChangeListener) {
        (**self).add_change_listener(listener)
    }
}

/// The listener list shared by the providers in this crate.
#[derive(Default)]
pub(crate) struct ChangeListeners {
    listeners: RefCell<Vec<ChangeListener>>,
}

impl ChangeListeners {
    pub(crate) fn add(&self, listener: ChangeListener) {
        self.listeners.borrow_mut().push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Call every listener in registration order.
    ///
    /// The list is snapshotted first, so a listener may subscribe further listeners or read the
    /// provider it is attached to.
    pub(crate) fn dispatch(&self, source: &str, target: &str) {
        let snapshot = self.listeners.borrow().clone();
        tracing::trace!(source, target, listeners = snapshot.len(), "dispatching history change");
        for listener in snapshot {
            listener(source, target);
        }
    }
}
