//! Route trees and the results of resolving URIs against them.

use std::sync::Arc;

use crate::uri::{join, UriMatchResult};

/// A node of the route tree.
///
/// The `path` of a child is relative to its parent: a child `/:id` below `/users` matches
/// `/users/42`. The `payload` is whatever the application wants to associate with the route and
/// is never inspected by the router.
///
/// ```rust
/// # use waypoint_router::Route;
/// let settings = Route::new("/settings", "settings")
///     .child(Route::new("/profile", "profile"))
///     .child(Route::new("/security", "security"));
///
/// assert!(!settings.is_leaf());
/// assert_eq!(settings.children.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route<T> {
    /// The path template of this node.
    ///
    /// Top-level templates are matched as written: `docs` matches `docs/intro` but not
    /// `/docs/intro`.
    pub path: String,
    /// Nested routes, in match priority order.
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub children: Vec<Arc<Route<T>>>,
    /// Application data attached to the route.
    pub payload: T,
}

impl<T> Route<T> {
    /// Create a leaf route.
    pub fn new(path: impl Into<String>, payload: T) -> Self {
        Self {
            path: path.into(),
            children: Vec::new(),
            payload,
        }
    }

    /// Append a child route.
    pub fn child(mut self, child: Route<T>) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Append several child routes.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Route<T>>) -> Self {
        self.children.extend(children.into_iter().map(Arc::new));
        self
    }

    /// Whether this route has no children. An explicitly empty child list counts as a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The outcome of resolving a URI against a route tree.
#[derive(Debug)]
pub struct RouteMatchResult<T> {
    /// The route that matched.
    pub route: Arc<Route<T>>,
    /// The ancestors of `route`, outermost first. Empty for a top-level route.
    pub parents: Vec<Arc<Route<T>>>,
    /// The parameters extracted from the URI.
    pub match_result: UriMatchResult,
}

// manual impls, derives would require `T: Clone`/`T: PartialEq` unnecessarily
impl<T> Clone for RouteMatchResult<T> {
    fn clone(&self) -> Self {
        Self {
            route: self.route.clone(),
            parents: self.parents.clone(),
            match_result: self.match_result.clone(),
        }
    }
}

impl<T> PartialEq for RouteMatchResult<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.route, &other.route)
            && self.parents.len() == other.parents.len()
            && self
                .parents
                .iter()
                .zip(&other.parents)
                .all(|(a, b)| Arc::ptr_eq(a, b))
            && self.match_result == other.match_result
    }
}

impl<T> RouteMatchResult<T> {
    /// The URI this result was resolved from.
    pub fn origin_uri(&self) -> &str {
        self.match_result.origin_uri()
    }

    /// The template of the matched route with all ancestor templates joined in front of it.
    ///
    /// A base URI configured on the resolver is not part of it.
    pub fn full_path(&self) -> String {
        join(
            self.parents
                .iter()
                .chain(std::iter::once(&self.route))
                .map(|route| route.path.as_str()),
        )
    }
}
