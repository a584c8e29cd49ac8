use std::{
    cell::RefCell,
    cmp::Ordering,
    rc::{Rc, Weak},
};

use waypoint_history::{History, HistoryError};

use crate::{
    observable::{Change, ListenerId},
    HistoryRouterConfig, ListenerError, Observable, Result, Route, RouteMatchResult,
    RouteMatcher, RouterError, Stack, TreeRouteMatcher,
};

/// The operations a router offers to the code that renders routes.
pub trait Router<T> {
    /// Resolve the URI the history provider currently reports.
    ///
    /// Returns [`None`] if no route matches it.
    fn get_current_matched(&self) -> Result<Option<RouteMatchResult<T>>>;

    /// A copy of the committed history, oldest first. The last entry is the current position.
    fn get_history_stack(&self) -> Vec<RouteMatchResult<T>>;

    /// A copy of the entries a forward [`Router::go`] can replay, oldest first.
    fn get_temporarily_stack(&self) -> Vec<RouteMatchResult<T>>;

    /// Navigate to `uri`.
    fn navigate_to(&self, uri: &str) -> Result<()>;

    /// Move `delta` entries through the history. Negative values go back.
    fn go(&self, delta: isize) -> Result<()>;

    /// Subscribe to changes of the current match.
    fn add_change_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&RouteMatchResult<T>>, Option<&RouteMatchResult<T>>) -> Result<(), ListenerError>
            + 'static;

    /// Remove a change listener. Returns whether it was subscribed.
    fn remove_change_listener(&self, id: ListenerId) -> bool;

    /// Add routes at runtime.
    fn register_routes(&self, routes: Vec<Route<T>>) -> Result<()>;

    /// Remove routes at runtime.
    fn unregister_routes(&self, routes: Vec<Route<T>>) -> Result<()>;
}

type Core<T> = RefCell<RouterCore<T>>;

struct RouterCore<T> {
    matcher: Rc<dyn RouteMatcher<T>>,
    exact: bool,
    history_stack: Stack<RouteMatchResult<T>>,
    temporarily_stack: Stack<RouteMatchResult<T>>,
    current: Observable<RouteMatchResult<T>>,
    /// Set while the router itself calls into the history provider.
    dispatching: bool,
}

impl<T> RouterCore<T> {
    fn is_current(&self, uri: &str) -> bool {
        self.current
            .get()
            .is_some_and(|current| current.origin_uri() == uri)
    }
}

/// A router that keeps its own navigation history in step with a [`History`] provider.
///
/// The router tracks two stacks of matches. The *history stack* holds every committed navigation,
/// its last entry being the current position. The *temporarily stack* holds the entries a
/// backward [`go`](Router::go) removed, so a forward `go` can put them back. A fresh navigation
/// clears it.
///
/// The last match is cached: the resolver only runs when the provider reports a URI the cache
/// does not hold. A URI no route matches empties the cache without touching the stacks. Every
/// overwrite of the cache is reported to the change listeners as `(previous, current)` before the
/// operation that caused it returns.
///
/// All router state is committed before the provider is called, and provider errors are not
/// rolled back. A failing provider therefore leaves the router ahead of the host.
///
/// The router also reacts to changes the provider reports on its own, like a user pressing the
/// browser's back button, by resolving the new URI and committing it as if
/// [`navigate_to`](Router::navigate_to) was called, without calling back into the provider.
pub struct HistoryRouter<T> {
    history: Rc<dyn History>,
    core: Rc<Core<T>>,
}

impl<T: 'static> HistoryRouter<T> {
    /// Create a router and subscribe it to the changes of the configured provider.
    ///
    /// Fails if a route template cannot be compiled.
    pub fn new(cfg: HistoryRouterConfig<T>) -> Result<Self> {
        let HistoryRouterConfig {
            routes,
            history,
            base_uri,
            route_matcher,
            exact,
            on_change,
        } = cfg;

        let matcher = match route_matcher {
            Some(matcher) => matcher,
            None => Rc::new(TreeRouteMatcher::with_base(routes, &base_uri)?),
        };

        let mut current = Observable::default();
        if let Some(listener) = on_change {
            current.subscribe(move |previous, next| listener(previous, next));
        }

        let core = Rc::new(RefCell::new(RouterCore {
            matcher,
            exact,
            history_stack: Stack::new(),
            temporarily_stack: Stack::new(),
            current,
            dispatching: false,
        }));

        let weak = Rc::downgrade(&core);
        history.add_change_listener(Rc::new(move |source: &str, target: &str| {
            external_change(&weak, source, target)
        }));

        Ok(Self { history, core })
    }

    /// Go back one entry. Same as `go(-1)`.
    pub fn go_back(&self) -> Result<()> {
        self.go(-1)
    }

    /// Go forward one entry. Same as `go(1)`.
    pub fn go_forward(&self) -> Result<()> {
        self.go(1)
    }

    /// Whether the history stack holds an entry before the current one.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.core.borrow().history_stack.len() > 1
    }

    /// Whether a backward move left entries to go forward to.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        !self.core.borrow().temporarily_stack.is_empty()
    }

    /// Call the provider, ignoring the change events it emits in response.
    fn dispatch(&self, op: impl FnOnce(&dyn History) -> Result<(), HistoryError>) -> Result<()> {
        let previous = std::mem::replace(&mut self.core.borrow_mut().dispatching, true);
        let result = op(&*self.history);
        self.core.borrow_mut().dispatching = previous;
        Ok(result?)
    }
}

/// Resolve `uri` without holding a borrow of the core.
fn resolve<T>(core: &Core<T>, uri: &str) -> Option<RouteMatchResult<T>> {
    let (matcher, exact) = {
        let core = core.borrow();
        (core.matcher.clone(), core.exact)
    };
    matcher.match_uri(uri, exact)
}

/// Push a fresh match onto the history stack, drop the redo entries and cache the match.
fn commit<T>(core: &Core<T>, result: RouteMatchResult<T>) -> Change<RouteMatchResult<T>> {
    let mut core = core.borrow_mut();
    core.temporarily_stack.clear();
    core.history_stack.push([result.clone()]);
    tracing::debug!(
        uri = result.origin_uri(),
        depth = core.history_stack.len(),
        "committed navigation"
    );
    core.current.replace(Some(result))
}

/// Drop the cached match after a URI resolved to nothing. The stacks are left alone.
///
/// Returns [`None`] when there was nothing cached, so listeners only hear about real changes.
fn invalidate<T>(core: &Core<T>) -> Option<Change<RouteMatchResult<T>>> {
    let mut core = core.borrow_mut();
    core.current.get()?;
    Some(core.current.replace(None))
}

fn notify<T>(change: Change<RouteMatchResult<T>>) -> Result<()> {
    change.notify().map_err(RouterError::Listener)
}

fn external_change<T>(core: &Weak<Core<T>>, source: &str, target: &str) {
    let Some(core) = core.upgrade() else {
        return;
    };
    if core.borrow().dispatching {
        tracing::trace!(source, target, "ignoring change issued by the router");
        return;
    }
    if core.borrow().is_current(target) {
        return;
    }

    let change = match resolve(&core, target) {
        Some(result) => commit(&core, result),
        None => {
            tracing::warn!(source, target, "no route matches the external change");
            match invalidate(&core) {
                Some(change) => change,
                None => return,
            }
        }
    };
    // nobody to hand the error to
    if let Err(err) = notify(change) {
        tracing::warn!(source, target, %err, "change listener failed");
    }
}

impl<T: 'static> Router<T> for HistoryRouter<T> {
    fn get_current_matched(&self) -> Result<Option<RouteMatchResult<T>>> {
        let uri = self.history.current_uri();
        {
            let core = self.core.borrow();
            if core.is_current(&uri) {
                return Ok(core.current.get().cloned());
            }
        }

        let Some(result) = resolve(&self.core, &uri) else {
            tracing::debug!(%uri, "no route matches the current uri");
            if let Some(change) = invalidate(&self.core) {
                notify(change)?;
            }
            return Ok(None);
        };

        let change = {
            let mut core = self.core.borrow_mut();
            core.history_stack.push([result.clone()]);
            core.current.replace(Some(result.clone()))
        };
        notify(change)?;
        Ok(Some(result))
    }

    fn get_history_stack(&self) -> Vec<RouteMatchResult<T>> {
        self.core.borrow().history_stack.to_vec()
    }

    fn get_temporarily_stack(&self) -> Vec<RouteMatchResult<T>> {
        self.core.borrow().temporarily_stack.to_vec()
    }

    fn navigate_to(&self, uri: &str) -> Result<()> {
        if self.core.borrow().is_current(uri) {
            tracing::trace!(uri, "already at uri");
            return Ok(());
        }

        match resolve(&self.core, uri) {
            Some(result) => notify(commit(&self.core, result))?,
            None => {
                tracing::warn!(uri, "no route matches, navigation not recorded");
                if let Some(change) = invalidate(&self.core) {
                    notify(change)?;
                }
            }
        }

        self.dispatch(|history| history.navigate_to(uri))
    }

    fn go(&self, delta: isize) -> Result<()> {
        let latest = {
            let mut core = self.core.borrow_mut();
            let core = &mut *core;
            let steps = delta.unsigned_abs();
            match delta.cmp(&0) {
                Ordering::Less => {
                    let popped = core.history_stack.pop(steps);
                    core.temporarily_stack.push(popped);
                }
                Ordering::Greater => {
                    let popped = core.temporarily_stack.pop(steps);
                    core.history_stack.push(popped);
                }
                Ordering::Equal => {}
            }
            tracing::debug!(
                delta,
                history = core.history_stack.len(),
                temporarily = core.temporarily_stack.len(),
                "moved through history"
            );
            core.history_stack.latest().cloned().map(|latest| {
                let uri = latest.origin_uri().to_string();
                (uri, core.current.replace(Some(latest)))
            })
        };

        if let Some((uri, change)) = latest {
            notify(change)?;
            self.dispatch(|history| history.navigate_to(&uri))?;
        }

        // the provider always sees the requested delta, however far the stacks moved
        self.dispatch(|history| history.go(delta))
    }

    fn add_change_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&RouteMatchResult<T>>, Option<&RouteMatchResult<T>>) -> Result<(), ListenerError>
            + 'static,
    {
        self.core.borrow_mut().current.subscribe(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.core.borrow_mut().current.unsubscribe(id)
    }

    fn register_routes(&self, _routes: Vec<Route<T>>) -> Result<()> {
        Err(RouterError::NotImplemented("register_routes"))
    }

    fn unregister_routes(&self, _routes: Vec<Route<T>>) -> Result<()> {
        Err(RouterError::NotImplemented("unregister_routes"))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use waypoint_history::MemoryHistory;

    use super::*;

    fn router(initial: &str) -> (Rc<MemoryHistory>, HistoryRouter<&'static str>) {
        let history = Rc::new(MemoryHistory::with_initial_path(initial));
        let cfg = HistoryRouterConfig::new(
            [
                Route::new("/a", "a"),
                Route::new("/b", "b"),
                Route::new("/c", "c"),
            ],
            history.clone(),
        );
        (history, HistoryRouter::new(cfg).unwrap())
    }

    fn uris(stack: Vec<RouteMatchResult<&'static str>>) -> Vec<String> {
        stack.iter().map(|r| r.origin_uri().to_string()).collect()
    }

    #[test]
    fn starts_empty() {
        let (_, router) = router("/a");
        assert!(router.get_history_stack().is_empty());
        assert!(router.get_temporarily_stack().is_empty());
        assert!(!router.can_go_back());
        assert!(!router.can_go_forward());
    }

    #[test]
    fn own_navigation_is_not_recorded_twice() {
        let (history, router) = router("/a");
        router.get_current_matched().unwrap();
        router.navigate_to("/b").unwrap();

        assert_eq!(history.current_uri(), "/b");
        assert_eq!(uris(router.get_history_stack()), ["/a", "/b"]);
    }

    #[test]
    fn host_navigation_is_recorded() {
        let (history, router) = router("/a");
        router.get_current_matched().unwrap();
        history.push("/c").unwrap();

        assert_eq!(uris(router.get_history_stack()), ["/a", "/c"]);
        let current = router.get_current_matched().unwrap().unwrap();
        assert_eq!(current.route.payload, "c");
    }

    #[test]
    fn unmatched_navigation_is_dropped() {
        let (history, router) = router("/a");
        router.navigate_to("/nowhere").unwrap();
        assert!(router.get_history_stack().is_empty());
        assert_eq!(history.current_uri(), "/nowhere");
        assert_eq!(router.get_current_matched().unwrap(), None);
    }

    #[test]
    fn listeners_can_read_the_router() {
        let (_, router) = router("/a");
        let router = Rc::new(router);
        let depth = Rc::new(Cell::new(0));

        let observed = depth.clone();
        let weak = Rc::downgrade(&router);
        router.add_change_listener(move |_, _| {
            if let Some(router) = weak.upgrade() {
                observed.set(router.get_history_stack().len());
            }
            Ok(())
        });

        router.navigate_to("/b").unwrap();
        assert_eq!(depth.get(), 1);
    }

    #[test]
    fn dropped_router_stops_listening() {
        let (history, router) = router("/a");
        drop(router);
        history.push("/b").unwrap();
        assert_eq!(history.current_uri(), "/b");
    }
}
