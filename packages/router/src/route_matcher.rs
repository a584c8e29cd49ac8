//! Resolving URIs against route trees.

use std::sync::Arc;

use crate::{
    route::{Route, RouteMatchResult},
    uri::{join, nest, UriMatchResult, UriMatcher},
    Result,
};

/// Something that can resolve a URI to a [`RouteMatchResult`].
///
/// [`TreeRouteMatcher`] is the implementation the router uses by default. Closures implement the
/// trait too, which is handy to observe or stub resolution.
pub trait RouteMatcher<T> {
    /// Find the best match for `uri`, or [`None`] when no route accepts it.
    ///
    /// With `exact` the whole path of `uri` has to be consumed by the matched route's template.
    fn match_uri(&self, uri: &str, exact: bool) -> Option<RouteMatchResult<T>>;
}

impl<T, F> RouteMatcher<T> for F
where
    F: Fn(&str, bool) -> Option<RouteMatchResult<T>>,
{
    fn match_uri(&self, uri: &str, exact: bool) -> Option<RouteMatchResult<T>> {
        self(uri, exact)
    }
}

#[derive(Debug)]
struct CompiledRoute<T> {
    route: Arc<Route<T>>,
    matcher: UriMatcher,
    children: Vec<CompiledRoute<T>>,
}

/// Resolves URIs against a tree of [`Route`]s.
///
/// Every template is compiled once, joined to its ancestors' templates, when the matcher is
/// built. Resolution then walks the tree:
///
/// 1. Siblings are tried in declaration order; the first one that accepts the URI wins.
/// 2. A route with children only needs to match a prefix of the URI. Its children are resolved
///    first and a descendant match is returned as is.
/// 3. When no descendant matches, the route itself is the match if its own template accepts the
///    URI.
///
/// ```rust
/// # use waypoint_router::{Route, RouteMatcher, TreeRouteMatcher};
/// let matcher = TreeRouteMatcher::new([
///     Route::new("/b", "b").child(Route::new("/1", "b1")),
///     Route::new("/a", "a"),
/// ])
/// .unwrap();
///
/// let result = matcher.match_uri("/b/1", false).unwrap();
/// assert_eq!(result.route.payload, "b1");
/// assert_eq!(result.parents[0].payload, "b");
///
/// let result = matcher.match_uri("/b", false).unwrap();
/// assert_eq!(result.route.payload, "b");
/// assert!(result.parents.is_empty());
///
/// assert!(matcher.match_uri("/c", false).is_none());
/// ```
#[derive(Debug)]
pub struct TreeRouteMatcher<T> {
    routes: Vec<CompiledRoute<T>>,
    parents: Vec<Arc<Route<T>>>,
}

impl<T> TreeRouteMatcher<T> {
    /// Build a matcher for top-level `routes`.
    pub fn new(routes: impl IntoIterator<Item = Route<T>>) -> Result<Self> {
        Self::with_base(routes, "")
    }

    /// Build a matcher for `routes` mounted below `base`.
    ///
    /// The base is part of every compiled template but never shows up in
    /// [`RouteMatchResult::parents`].
    pub fn with_base(routes: impl IntoIterator<Item = Route<T>>, base: &str) -> Result<Self> {
        Self::build(routes.into_iter().map(Arc::new), Vec::new(), base)
    }

    /// Build a matcher for `routes` whose ancestors are already known to be on the matching path.
    ///
    /// The `parents` contribute their templates as a prefix and are reported, outermost first,
    /// in front of the ancestors found during resolution.
    pub fn with_parents(
        routes: impl IntoIterator<Item = Arc<Route<T>>>,
        parents: Vec<Arc<Route<T>>>,
    ) -> Result<Self> {
        Self::build(routes, parents, "")
    }

    fn build(
        routes: impl IntoIterator<Item = Arc<Route<T>>>,
        parents: Vec<Arc<Route<T>>>,
        base: &str,
    ) -> Result<Self> {
        let prefix = join(
            std::iter::once(base)
                .chain(parents.iter().map(|p| p.path.as_str()))
                .filter(|part| !part.is_empty()),
        );
        let routes = compile(routes, &prefix)?;
        Ok(Self { routes, parents })
    }

    /// The top-level routes, in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route<T>>> {
        self.routes.iter().map(|compiled| &compiled.route)
    }
}

fn compile<T>(
    routes: impl IntoIterator<Item = Arc<Route<T>>>,
    prefix: &str,
) -> Result<Vec<CompiledRoute<T>>> {
    routes
        .into_iter()
        .map(|route| {
            let template = nest(prefix, &route.path);
            let children = compile(route.children.iter().cloned(), &template)?;
            let matcher = UriMatcher::compile(template)?;
            Ok(CompiledRoute {
                route,
                matcher,
                children,
            })
        })
        .collect()
}

fn resolve<T>(
    routes: &[CompiledRoute<T>],
    parents: &mut Vec<Arc<Route<T>>>,
    uri: &str,
    exact: bool,
) -> Option<RouteMatchResult<T>> {
    for compiled in routes {
        if !compiled.children.is_empty() && compiled.matcher.test(uri, false) {
            parents.push(compiled.route.clone());
            let found = resolve(&compiled.children, parents, uri, exact);
            parents.pop();
            if found.is_some() {
                return found;
            }
        }

        if !compiled.matcher.test(uri, exact) {
            continue;
        }

        match UriMatchResult::extract(&compiled.matcher, uri) {
            Ok(match_result) => {
                return Some(RouteMatchResult {
                    route: compiled.route.clone(),
                    parents: parents.clone(),
                    match_result,
                })
            }
            Err(err) => {
                tracing::error!(%err, template = compiled.matcher.template(), "accepted uri without parameters");
            }
        }
    }
    None
}

impl<T> RouteMatcher<T> for TreeRouteMatcher<T> {
    fn match_uri(&self, uri: &str, exact: bool) -> Option<RouteMatchResult<T>> {
        let mut parents = self.parents.clone();
        let found = resolve(&self.routes, &mut parents, uri, exact);
        match &found {
            Some(result) => {
                tracing::debug!(uri, exact, route = %result.full_path(), "resolved uri")
            }
            None => tracing::debug!(uri, exact, "no route matches uri"),
        }
        found
    }
}
