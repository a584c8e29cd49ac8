use waypoint_history::HistoryError;

/// The error a change listener returns to abort delivery of a change.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// An error that can occur while matching URIs or driving a [`HistoryRouter`].
///
/// A URI that matches no route is *not* an error for the resolver or the router; they report it
/// as [`None`]. Only [`UriMatcher::match_uri`] surfaces [`RouterError::NoMatch`].
///
/// [`HistoryRouter`]: crate::HistoryRouter
/// [`UriMatcher::match_uri`]: crate::uri::UriMatcher::match_uri
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The URI does not match the template.
    #[error("URI {uri:?} does not match")]
    NoMatch {
        /// The URI that was tested.
        uri: String,
    },

    /// Parameters were extracted from a URI that was never confirmed to match.
    #[error("cannot extract parameters of {uri:?}: it does not match pattern {pattern:?}")]
    MatchAssertion {
        /// The template of the matcher.
        pattern: String,
        /// The URI parameters were requested for.
        uri: String,
    },

    /// The template cannot be compiled into a matcher.
    #[error("invalid route template {template:?}")]
    InvalidPattern {
        /// The full template, prefixes included.
        template: String,
        /// The underlying compilation error.
        #[source]
        source: regex::Error,
    },

    /// The operation is declared but deliberately not supported.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// A change listener failed. Listeners registered after it were not called.
    #[error("change listener failed: {0}")]
    Listener(#[source] ListenerError),

    /// The history provider failed after the router committed its own state.
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// A `Result` whose error type defaults to [`RouterError`].
pub type Result<T, E = RouterError> = std::result::Result<T, E>;
