use std::{borrow::Cow, collections::HashMap};

use regex::Regex;

use super::join;
use crate::{Result, RouterError};

/// A compiled path template.
///
/// Templates are made of literal segments and `:name` segments. A `:name` segment captures exactly
/// one path segment. A trailing `/` on the tested URI is always tolerated.
///
/// ```rust
/// # use waypoint_router::uri::UriMatcher;
/// let matcher = UriMatcher::new("/users/:id").unwrap();
/// assert!(matcher.test("/users/7", true));
/// assert!(matcher.test("/users/7/", true));
/// assert!(matcher.test("/users/7/posts", false));
/// assert!(!matcher.test("/users/7/posts", true));
///
/// let result = matcher.match_uri("/users/7?tab=posts").unwrap();
/// assert_eq!(result.path_param("id"), Some("7"));
/// assert_eq!(result.query_param("tab"), Some("posts"));
/// ```
#[derive(Debug, Clone)]
pub struct UriMatcher {
    template: String,
    exact: Regex,
    prefix: Regex,
    params: Vec<String>,
}

impl UriMatcher {
    /// Compile `template`.
    pub fn new(template: &str) -> Result<Self> {
        Self::with_base(template, "")
    }

    /// Compile `template` mounted below `base`.
    ///
    /// ```rust
    /// # use waypoint_router::uri::UriMatcher;
    /// let matcher = UriMatcher::with_base("/a", "/base/").unwrap();
    /// assert_eq!(matcher.template(), "/base/a");
    /// ```
    pub fn with_base(template: &str, base: &str) -> Result<Self> {
        Self::compile(nest(base, template))
    }

    /// Compile a template that already carries all of its prefixes.
    ///
    /// A template without a leading `/` only matches URIs without one.
    pub(crate) fn compile(template: String) -> Result<Self> {
        let rooted = template.is_empty() || template.starts_with('/');
        let mut body = String::new();
        let mut params = Vec::new();
        for (idx, segment) in template.split('/').filter(|s| !s.is_empty()).enumerate() {
            if rooted || idx > 0 {
                body.push('/');
            }
            match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => {
                    body.push_str("([^/]+)");
                    params.push(name.to_string());
                }
                _ => body.push_str(&regex::escape(segment)),
            }
        }

        let build = |pattern: String| {
            Regex::new(&pattern).map_err(|source| RouterError::InvalidPattern {
                template: template.clone(),
                source,
            })
        };
        let exact = build(format!("^{body}/?$"))?;
        let prefix = build(format!("^{body}(?:/|$)"))?;

        Ok(Self {
            template,
            exact,
            prefix,
            params,
        })
    }

    /// The full template, prefixes included.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The names of the path parameters, in template order.
    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    /// Check whether the path portion of `uri` matches.
    ///
    /// When `exact` is [`false`] the template only has to match a leading run of whole segments,
    /// which is how ancestors are tested against the URIs of their descendants.
    pub fn test(&self, uri: &str, exact: bool) -> bool {
        let (path, _) = split_uri(uri);
        let regex = if exact { &self.exact } else { &self.prefix };
        let matched = regex.is_match(path);
        tracing::trace!(template = %self.template, uri, exact, matched, "tested uri");
        matched
    }

    /// Match `uri` and extract its parameters.
    ///
    /// Fails with [`RouterError::NoMatch`] unless `self.test(uri, false)` holds.
    pub fn match_uri(&self, uri: &str) -> Result<UriMatchResult> {
        if !self.test(uri, false) {
            return Err(RouterError::NoMatch {
                uri: uri.to_string(),
            });
        }
        UriMatchResult::extract(self, uri)
    }
}

/// Put `template` below `prefix`. An empty prefix leaves the template as written.
pub(crate) fn nest(prefix: &str, template: &str) -> String {
    if prefix.is_empty() {
        template.to_string()
    } else {
        join([prefix, template])
    }
}

/// Split a URI at its first `?` into path and query.
fn split_uri(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// The parameters of a URI that matched a [`UriMatcher`].
///
/// Whole-map accessors hand out copies, so callers can never change what a later read returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriMatchResult {
    origin_uri: String,
    path_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
}

impl UriMatchResult {
    /// Assemble a result by hand, for [`RouteMatcher`](crate::RouteMatcher) implementations that
    /// don't use [`UriMatcher`].
    pub fn new(
        origin_uri: impl Into<String>,
        path_params: HashMap<String, String>,
        query_params: HashMap<String, String>,
    ) -> Self {
        Self {
            origin_uri: origin_uri.into(),
            path_params,
            query_params,
        }
    }

    pub(crate) fn extract(matcher: &UriMatcher, uri: &str) -> Result<Self> {
        let (path, query) = split_uri(uri);
        let captures =
            matcher
                .prefix
                .captures(path)
                .ok_or_else(|| RouterError::MatchAssertion {
                    pattern: matcher.template.clone(),
                    uri: uri.to_string(),
                })?;

        let path_params: HashMap<String, String> = matcher
            .params
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(name, value)| Some((name.clone(), decode_segment(value?.as_str()))))
            .collect();

        // later occurrences of a key overwrite earlier ones
        let query_params: HashMap<String, String> = query
            .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(Self::new(uri, path_params, query_params))
    }

    /// The exact URI this result was produced from.
    pub fn origin_uri(&self) -> &str {
        &self.origin_uri
    }

    /// A copy of all path parameters.
    pub fn path_params(&self) -> HashMap<String, String> {
        self.path_params.clone()
    }

    /// A copy of all query parameters.
    pub fn query_params(&self) -> HashMap<String, String> {
        self.query_params.clone()
    }

    /// A single path parameter.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// A single query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn prefix_and_exact() {
        let matcher = UriMatcher::new("/a").unwrap();
        assert!(matcher.test("/a", false));
        assert!(matcher.test("/a/b", false));
        assert!(matcher.test("/a", true));
        assert!(matcher.test("/a/", true));
        assert!(!matcher.test("/a/b", true));
    }

    #[test]
    fn prefix_stops_at_segment_boundaries() {
        let matcher = UriMatcher::new("/a").unwrap();
        assert!(!matcher.test("/ab", false));
        assert!(!matcher.test("/b/a", false));
    }

    #[test]
    fn query_is_ignored_when_testing() {
        let matcher = UriMatcher::new("/a").unwrap();
        assert!(matcher.test("/a?x=1", true));
        assert!(matcher.test("/a/?x=/b", true));
    }

    #[test]
    fn root_template() {
        let matcher = UriMatcher::new("/").unwrap();
        assert!(matcher.test("/", true));
        assert!(matcher.test("", true));
        assert!(matcher.test("/anything", false));
        assert!(!matcher.test("/anything", true));
    }

    #[test]
    fn literal_segments_are_escaped() {
        let matcher = UriMatcher::new("/file.json").unwrap();
        assert!(matcher.test("/file.json", true));
        assert!(!matcher.test("/fileXjson", true));
    }

    #[test]
    fn extracts_parameters() {
        let matcher = UriMatcher::new("/a/:par1").unwrap();
        let result = matcher
            .match_uri("/a/par1value?q1=q1value&q2=q2value")
            .unwrap();

        assert_eq!(result.origin_uri(), "/a/par1value?q1=q1value&q2=q2value");
        assert_eq!(result.path_param("par1"), Some("par1value"));
        assert_eq!(result.query_param("q1"), Some("q1value"));
        assert_eq!(result.query_param("q2"), Some("q2value"));
    }

    #[test]
    fn parameters_of_a_prefix_match() {
        let matcher = UriMatcher::new("/users/:id").unwrap();
        let result = matcher.match_uri("/users/9/settings").unwrap();
        assert_eq!(result.path_param("id"), Some("9"));
    }

    #[test]
    fn values_are_decoded() {
        let matcher = UriMatcher::new("/tags/:tag").unwrap();
        let result = matcher
            .match_uri("/tags/rust%20lang?q=a+b&name=%E2%9C%93")
            .unwrap();
        assert_eq!(result.path_param("tag"), Some("rust lang"));
        assert_eq!(result.query_param("q"), Some("a b"));
        assert_eq!(result.query_param("name"), Some("✓"));
    }

    #[test]
    fn repeated_query_keys_keep_the_last_value() {
        let matcher = UriMatcher::new("/").unwrap();
        let result = matcher.match_uri("/?page=1&page=2").unwrap();
        assert_eq!(result.query_param("page"), Some("2"));
    }

    #[test]
    fn returned_maps_are_copies() {
        let matcher = UriMatcher::new("/a/:par1").unwrap();
        let result = matcher.match_uri("/a/val?q1=q1value").unwrap();

        let mut params = result.path_params();
        params.insert("par1".to_string(), "changed".to_string());
        let mut query = result.query_params();
        query.clear();

        assert_eq!(result.path_param("par1"), Some("val"));
        assert_eq!(result.query_params().len(), 1);
    }

    #[test]
    fn mismatch_is_reported() {
        let matcher = UriMatcher::new("/a").unwrap();
        let err = matcher.match_uri("/b").unwrap_err();
        assert!(matches!(err, RouterError::NoMatch { uri } if uri == "/b"));
    }

    #[test]
    fn extraction_asserts_a_match() {
        let matcher = UriMatcher::new("/a").unwrap();
        let err = UriMatchResult::extract(&matcher, "/b").unwrap_err();
        assert!(
            matches!(&err, RouterError::MatchAssertion { pattern, uri } if pattern == "/a" && uri == "/b")
        );
    }

    #[test]
    fn relative_templates_stay_relative() {
        let matcher = UriMatcher::new("a/:id").unwrap();
        assert_eq!(matcher.template(), "a/:id");
        assert!(matcher.test("a/1", true));
        assert!(matcher.test("a/1/more", false));
        assert!(!matcher.test("/a/1", false));
        assert_eq!(matcher.match_uri("a/1").unwrap().path_param("id"), Some("1"));

        let nested = UriMatcher::with_base("a", "/base").unwrap();
        assert!(nested.test("/base/a", true));
    }

    #[test]
    fn base_is_joined() {
        let matcher = UriMatcher::with_base("/a", "/base").unwrap();
        assert!(matcher.test("/base/a?a=1", true));
        assert!(!matcher.test("/a", false));
    }
}
