/// Concatenate path segments with `/`, collapsing runs of separators.
///
/// ```rust
/// # use waypoint_router::uri::join;
/// assert_eq!(join(["/a", "b/", "/c"]), "/a/b/c");
/// assert_eq!(join(["", "/users"]), "/users");
/// ```
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join_with(parts, '/')
}

/// Concatenate segments with `separator`, collapsing runs of it into one.
pub fn join_with<I, S>(parts: I, separator: char) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (idx, part) in parts.into_iter().enumerate() {
        if idx > 0 {
            joined.push(separator);
        }
        joined.push_str(part.as_ref());
    }

    let mut collapsed = String::with_capacity(joined.len());
    let mut previous = None;
    for c in joined.chars() {
        if c == separator && previous == Some(separator) {
            continue;
        }
        collapsed.push(c);
        previous = Some(c);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_duplicate_separators() {
        assert_eq!(join(["/base/", "/a//b", "c"]), "/base/a/b/c");
        assert_eq!(join(["", ""]), "/");
        assert_eq!(join(["/a", "/"]), "/a/");
    }

    #[test]
    fn empty_input() {
        assert_eq!(join(Vec::<&str>::new()), "");
        assert_eq!(join(["a"]), "a");
    }

    #[test]
    fn custom_separator() {
        assert_eq!(join_with(["a.", ".b", "c"], '.'), "a.b.c");
    }
}
