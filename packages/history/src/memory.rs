use std::cell::RefCell;

use crate::{ChangeListener, ChangeListeners, History, HistoryError};

struct MemoryHistoryState {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistoryState {
    fn current(&self) -> &str {
        &self.entries[self.cursor]
    }
}

/// A [`History`] provider that stores all navigation information in memory.
///
/// Every transition, whether it was requested through the [`History`] trait or through the
/// host-side [`MemoryHistory::push`] and [`MemoryHistory::replace`], is reported to the change
/// listeners as `(source, target)`.
pub struct MemoryHistory {
    state: RefCell<MemoryHistoryState>,
    listeners: ChangeListeners,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path`.
    ///
    /// ```rust
    /// # use waypoint_history::{History, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/login");
    /// assert_eq!(history.current_uri(), "/login");
    /// assert_eq!(history.can_go_back(), false);
    /// ```
    pub fn with_initial_path(path: impl ToString) -> Self {
        Self {
            state: RefCell::new(MemoryHistoryState {
                entries: vec![path.to_string()],
                cursor: 0,
            }),
            listeners: ChangeListeners::default(),
        }
    }

    /// Check whether there is a previous entry to go back to.
    pub fn can_go_back(&self) -> bool {
        self.state.borrow().cursor > 0
    }

    /// Check whether there is a future entry to go forward to.
    pub fn can_go_forward(&self) -> bool {
        let state = self.state.borrow();
        state.cursor + 1 < state.entries.len()
    }

    /// All entries, oldest first. The active one is at [`MemoryHistory::position`].
    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().entries.clone()
    }

    /// The index of the active entry.
    pub fn position(&self) -> usize {
        self.state.borrow().cursor
    }

    /// Push a new entry on behalf of the host, as if the user followed a link the router did not
    /// handle.
    ///
    /// Identical to [`History::navigate_to`]; provided so host-side code reads as such.
    pub fn push(&self, uri: impl Into<String>) -> Result<(), HistoryError> {
        let uri = uri.into();
        self.navigate_to(&uri)
    }

    /// Replace the active entry without touching the past or the future.
    pub fn replace(&self, uri: impl Into<String>) -> Result<(), HistoryError> {
        let uri = uri.into();
        check_uri(&uri)?;

        let source = {
            let mut state = self.state.borrow_mut();
            let cursor = state.cursor;
            std::mem::replace(&mut state.entries[cursor], uri.clone())
        };
        self.listeners.dispatch(&source, &uri);
        Ok(())
    }

    /// The number of subscribed change listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

fn check_uri(uri: &str) -> Result<(), HistoryError> {
    if uri.starts_with("//") {
        tracing::error!(r#"cannot navigate to paths starting with "//", path: {uri}"#);
        return Err(HistoryError::Rejected {
            uri: uri.to_string(),
            reason: "protocol-relative URIs leave the application".to_string(),
        });
    }
    Ok(())
}

impl History for MemoryHistory {
    fn current_uri(&self) -> String {
        self.state.borrow().current().to_string()
    }

    fn navigate_to(&self, uri: &str) -> Result<(), HistoryError> {
        check_uri(uri)?;

        let source = {
            let mut state = self.state.borrow_mut();
            // don't push the same entry twice
            if state.current() == uri {
                return Ok(());
            }
            let source = state.current().to_string();
            let next = state.cursor + 1;
            state.entries.truncate(next);
            state.entries.push(uri.to_string());
            state.cursor = next;
            source
        };
        self.listeners.dispatch(&source, uri);
        Ok(())
    }

    fn go(&self, delta: isize) -> Result<(), HistoryError> {
        let moved = {
            let mut state = self.state.borrow_mut();
            let last = state.entries.len() - 1;
            let target = state.cursor.saturating_add_signed(delta).min(last);
            if target == state.cursor {
                None
            } else {
                let source = state.current().to_string();
                state.cursor = target;
                Some((source, state.current().to_string()))
            }
        };

        if let Some((source, target)) = moved {
            self.listeners.dispatch(&source, &target);
        }
        Ok(())
    }

    fn add_change_listener(&self, listener: ChangeListener) {
        self.listeners.add(listener);
    }
}
