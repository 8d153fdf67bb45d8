//! Path predicates used to classify modules and packages.
//!
//! Import paths are compared segment by segment: `foo/bar2` is not under
//! `foo/bar`.

use std::path::{Component, Path, PathBuf};

/// Returns `true` if `path` equals `prefix` or is a `/`-delimited descendant of it.
pub fn has_path_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Number of leading path segments shared by `a` and `b`.
pub fn common_prefix_segments(a: &str, b: &str) -> usize {
    a.split('/')
        .zip(b.split('/'))
        .take_while(|(x, y)| x == y)
        .count()
}

/// Returns `true` if any segment of `path` equals `segment`.
pub fn has_path_segment(path: &str, segment: &str) -> bool {
    path.split('/').any(|s| s == segment)
}

/// Standard-library classification for an import path.
///
/// A path is stdlib when its first segment contains no dot, or when it lies
/// under one of the trusted prefixes.
pub fn is_stdlib_path(path: &str, trusted_prefixes: &[String]) -> bool {
    let first = path.split('/').next().unwrap_or("");
    if !first.contains('.') {
        return true;
    }
    trusted_prefixes
        .iter()
        .map(|p| p.trim_end_matches('/'))
        .any(|p| has_path_prefix(path, p))
}

/// Returns `true` if a replace target names a filesystem location rather than a module.
///
/// Local targets start with `.`, `/`, or a drive letter such as `C:`.
pub fn is_local_replace_target(target: &str) -> bool {
    if target.starts_with('.') || target.starts_with('/') {
        return true;
    }
    let bytes = target.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Lexically normalises a path: drops `.` and folds `..` into its parent.
///
/// Leading `..` components of a relative path are preserved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Returns `true` if a package name carries the test suffix.
pub fn is_test_name(name: &str, suffix: &str) -> bool {
    !suffix.is_empty() && name.ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_respects_segment_boundary() {
        assert!(has_path_prefix("foo/bar", "foo/bar"));
        assert!(has_path_prefix("foo/bar/baz", "foo/bar"));
        assert!(!has_path_prefix("foo/bar2", "foo/bar"));
        assert!(!has_path_prefix("foo", "foo/bar"));
        assert!(!has_path_prefix("foo", ""));
    }

    #[test]
    fn test_common_prefix_segments() {
        assert_eq!(common_prefix_segments("a/b/c", "a/b/d"), 2);
        assert_eq!(common_prefix_segments("a/bc", "a/b"), 1);
        assert_eq!(common_prefix_segments("x", "y"), 0);
    }

    #[test]
    fn test_stdlib_classification() {
        let trusted = vec!["golang.org/x/".to_string()];
        assert!(is_stdlib_path("fmt", &trusted));
        assert!(is_stdlib_path("net/http", &trusted));
        assert!(is_stdlib_path("golang.org/x/tools/go/packages", &trusted));
        assert!(!is_stdlib_path("golang.org/xerrors", &trusted));
        assert!(!is_stdlib_path("github.com/pkg/errors", &trusted));
        assert!(!is_stdlib_path("example.com/app", &[]));
    }

    #[test]
    fn test_local_replace_targets() {
        assert!(is_local_replace_target("./lib"));
        assert!(is_local_replace_target("../lib"));
        assert!(is_local_replace_target("/abs/lib"));
        assert!(is_local_replace_target("C:\\work\\lib"));
        assert!(is_local_replace_target("c:/work/lib"));
        assert!(!is_local_replace_target("example.com/lib"));
        assert!(!is_local_replace_target("lib"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/work/app/./../lib")),
            PathBuf::from("/work/lib")
        );
        assert_eq!(normalize_path(Path::new("a/b/../../..")), PathBuf::from(".."));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }
}
