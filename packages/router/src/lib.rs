#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod uri;

mod error;
pub use error::*;

mod observable;
pub use observable::{Change, Listener, ListenerId, Observable};

mod route;
pub use route::*;

mod route_matcher;
pub use route_matcher::*;

mod stack;
pub use stack::*;

mod router_cfg;
pub use router_cfg::HistoryRouterConfig;

mod history_router;
pub use history_router::*;

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::history_router::{HistoryRouter, Router};
    pub use crate::observable::{ListenerId, Observable};
    pub use crate::route::{Route, RouteMatchResult};
    pub use crate::route_matcher::{RouteMatcher, TreeRouteMatcher};
    pub use crate::router_cfg::HistoryRouterConfig;
    pub use crate::stack::Stack;
    pub use crate::uri::{UriMatchResult, UriMatcher};
    pub use crate::{ListenerError, RouterError};
    pub use waypoint_history::{CallbackHistory, History, HistoryError, MemoryHistory};
}
