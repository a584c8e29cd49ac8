use std::rc::Rc;

use waypoint_history::History;

use crate::{observable::Listener, ListenerError, Route, RouteMatchResult, RouteMatcher};

/// Configuration for a [`HistoryRouter`](crate::HistoryRouter).
///
/// The routes and the history provider are mandatory, everything else follows the builder
/// pattern:
///
/// ```rust
/// # use std::rc::Rc;
/// # use waypoint_history::MemoryHistory;
/// # use waypoint_router::prelude::*;
/// let history = Rc::new(MemoryHistory::with_initial_path("/app/settings"));
/// let cfg = HistoryRouterConfig::new([Route::new("/settings", "settings")], history)
///     .base_uri("/app")
///     .on_change(|_previous, current| {
///         println!("now at {:?}", current.map(|c| c.origin_uri()));
///         Ok(())
///     });
///
/// let router = HistoryRouter::new(cfg).unwrap();
/// assert_eq!(router.get_current_matched().unwrap().unwrap().route.payload, "settings");
/// ```
pub struct HistoryRouterConfig<T> {
    pub(crate) routes: Vec<Route<T>>,
    pub(crate) history: Rc<dyn History>,
    pub(crate) base_uri: String,
    pub(crate) route_matcher: Option<Rc<dyn RouteMatcher<T>>>,
    pub(crate) exact: bool,
    pub(crate) on_change: Option<Listener<RouteMatchResult<T>>>,
}

impl<T: 'static> HistoryRouterConfig<T> {
    /// Route `routes` on top of `history`.
    pub fn new<H: History + 'static>(
        routes: impl IntoIterator<Item = Route<T>>,
        history: Rc<H>,
    ) -> Self {
        Self {
            routes: routes.into_iter().collect(),
            history,
            base_uri: String::new(),
            route_matcher: None,
            exact: false,
            on_change: None,
        }
    }

    /// A prefix every URI the router handles starts with.
    ///
    /// It is joined in front of every top-level template but is not a route, so it never shows up
    /// in [`RouteMatchResult::parents`].
    ///
    /// Defaults to no prefix.
    pub fn base_uri(self, base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..self
        }
    }

    /// Resolve URIs with `route_matcher` instead of a [`TreeRouteMatcher`](crate::TreeRouteMatcher)
    /// built from the routes.
    ///
    /// The routes and the base URI are ignored when this is set.
    pub fn route_matcher(self, route_matcher: impl RouteMatcher<T> + 'static) -> Self {
        Self {
            route_matcher: Some(Rc::new(route_matcher)),
            ..self
        }
    }

    /// Whether a route has to consume the whole path of a URI to match it.
    ///
    /// Defaults to [`false`], so `/users` also matches `/users/42/unknown`.
    pub fn exact(self, exact: bool) -> Self {
        Self { exact, ..self }
    }

    /// A change listener that is subscribed before the router does anything.
    ///
    /// Defaults to [`None`].
    pub fn on_change(
        self,
        listener: impl Fn(
                Option<&RouteMatchResult<T>>,
                Option<&RouteMatchResult<T>>,
            ) -> Result<(), ListenerError>
            + 'static,
    ) -> Self {
        Self {
            on_change: Some(Rc::new(listener)),
            ..self
        }
    }
}
