//! Content Path Helpers
//!
//! Content paths are `/`-separated strings. Absolute paths start at the root `/`;
//! relative paths (e.g. `a/b`) are accepted as-is and treated the same way by the
//! store, which is why none of these helpers force a leading slash.

/// The repository root path
pub const ROOT: &str = "/";

/// Join a relative path onto a base path.
///
/// An empty base keeps the relative path untouched; an absolute `relative`
/// replaces the base entirely.
pub fn join(base: &str, relative: &str) -> String {
    if relative.starts_with('/') || base.is_empty() {
        return relative.to_string();
    }
    if relative.is_empty() {
        return base.to_string();
    }
    if base.ends_with('/') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

/// Parent path of `path`, or `None` at the root.
///
/// ```rust
/// use sparsepost_core::utils::path::parent;
///
/// assert_eq!(parent("/a/b"), Some("/a"));
/// assert_eq!(parent("/a"), Some("/"));
/// assert_eq!(parent("a/b"), Some("a"));
/// assert_eq!(parent("a"), None);
/// assert_eq!(parent("/"), None);
/// ```
pub fn parent(path: &str) -> Option<&str> {
    let trimmed = trim_trailing_slash(path);
    if trimmed.is_empty() || trimmed == ROOT {
        return None;
    }
    match trimmed.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&trimmed[..idx]),
        None => None,
    }
}

/// Last segment of `path` (empty for the root)
pub fn name(path: &str) -> &str {
    let trimmed = trim_trailing_slash(path);
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Resolve `.` and `..` segments and collapse duplicate separators.
///
/// `..` above the first segment is dropped rather than escaping the root.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// True when `path` is `ancestor` itself or lies below it
pub fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    if path == ancestor {
        return true;
    }
    if ancestor == ROOT {
        return path.starts_with('/');
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// Re-root `path` (at or below `from`) under `to`
pub fn rebase(path: &str, from: &str, to: &str) -> String {
    if path == from {
        return to.to_string();
    }
    let tail = &path[from.len()..];
    if to.ends_with('/') {
        format!("{}{}", to, tail.trim_start_matches('/'))
    } else {
        format!("{}{}", to, tail)
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_variants() {
        assert_eq!(join("", "a/b/title"), "a/b/title");
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/content", "a"), "/content/a");
        assert_eq!(join("/content/", "a"), "/content/a");
        assert_eq!(join("/content", "/abs"), "/abs");
        assert_eq!(join("/content", ""), "/content");
    }

    #[test]
    fn test_name_and_parent() {
        assert_eq!(name("/a/b/c"), "c");
        assert_eq!(name("c"), "c");
        assert_eq!(name("/"), "");
        assert_eq!(parent("/a/b/"), Some("/a"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/a/./b/../c"), "/a/c");
        assert_eq!(normalize("a//b"), "a/b");
        assert_eq!(normalize("/../a"), "/a");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn test_descendant_and_rebase() {
        assert!(is_same_or_descendant("/a/b", "/a"));
        assert!(is_same_or_descendant("/a", "/a"));
        assert!(!is_same_or_descendant("/ab", "/a"));
        assert!(is_same_or_descendant("/x", "/"));
        assert_eq!(rebase("/a/b/c", "/a/b", "/z"), "/z/c");
        assert_eq!(rebase("/a/b", "/a/b", "/z"), "/z");
    }
}
