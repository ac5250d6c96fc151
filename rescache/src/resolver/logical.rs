//! Logical path handling.
//!
//! A logical path is the name a resource is requested by, independent of
//! where it lives. In normalized form it is relative, `/`-separated, and
//! free of `.` and `..` components; the empty string names the root.
//! Anything that cannot be expressed that way (absolute paths, `..`,
//! Windows prefixes, non-UTF-8 names) has no logical form and is never
//! looked up.

use std::path::{Component, Path, PathBuf};

/// Normalizes `path` to its logical form.
///
/// Returns `None` if the path is absolute, contains `..`, or is not valid
/// UTF-8. Leading and trailing spaces inside names are preserved.
///
/// # Examples
///
/// ```
/// use rescache::resolver::logical::normalize;
/// use std::path::Path;
///
/// assert_eq!(normalize(Path::new("./webroot//subdir/")), Some("webroot/subdir".to_string()));
/// assert_eq!(normalize(Path::new("")), Some(String::new()));
/// assert_eq!(normalize(Path::new("a/../b")), None);
/// assert_eq!(normalize(Path::new("/a/a.txt")), None);
/// ```
#[must_use]
pub fn normalize(path: &Path) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(segments.join("/"))
}

/// [`normalize`] for string input.
#[must_use]
pub fn normalize_str(path: &str) -> Option<String> {
    normalize(Path::new(path))
}

/// Joins a child name onto a normalized logical parent.
///
/// # Examples
///
/// ```
/// use rescache::resolver::logical::join;
///
/// assert_eq!(join("", "webroot"), "webroot");
/// assert_eq!(join("webroot", "subdir"), "webroot/subdir");
/// ```
#[must_use]
pub fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}/{child}")
    }
}

/// Whether `name` is usable as a single child segment of a directory.
#[must_use]
pub fn is_child_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Maps a normalized logical path onto a relative native path.
#[must_use]
pub fn to_native(logical: &str) -> PathBuf {
    logical.split('/').filter(|s| !s.is_empty()).collect()
}

/// Resolves `.` and `..` lexically in an absolute path, without touching the
/// filesystem.
///
/// Returns `None` if `..` would climb above the root.
#[must_use]
pub fn lexical_absolute(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                result.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
        }
    }
    Some(result)
}

/// Rebases an absolute `path` that lies under `root` to its logical form
/// relative to `root`.
///
/// Both paths are compared lexically. Returns `None` when `path` is outside
/// `root`.
///
/// # Examples
///
/// ```
/// use rescache::resolver::logical::rebase;
/// use std::path::Path;
///
/// let root = Path::new("/tmp/rescache-cache-1");
/// assert_eq!(rebase(root, Path::new("/tmp/rescache-cache-1/a/../b/b.txt")), Some("b/b.txt".to_string()));
/// assert_eq!(rebase(root, Path::new("/tmp/rescache-cache-1")), Some(String::new()));
/// assert_eq!(rebase(root, Path::new("/tmp/other/a.txt")), None);
/// ```
#[must_use]
pub fn rebase(root: &Path, path: &Path) -> Option<String> {
    let path = lexical_absolute(path)?;
    let relative = path.strip_prefix(root).ok()?;
    normalize(relative)
}


#[cfg(all(test, feature = "property-tests"))]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 _.-]{1,12}".prop_filter("not a dot segment", |s| s != "." && s != "..")
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 2000,
            .. ProptestConfig::default()
        })]

        // Normalization is idempotent.
        #[test]
        fn normalize_idempotent(parts in prop::collection::vec(segment(), 0..6)) {
            let raw = parts.join("/");
            if let Some(once) = normalize_str(&raw) {
                prop_assert_eq!(normalize_str(&once), Some(once.clone()));
            }
        }

        // A normalized path never contains a parent reference segment.
        #[test]
        fn normalized_has_no_parent_segments(parts in prop::collection::vec(segment(), 0..6)) {
            if let Some(normalized) = normalize_str(&parts.join("/")) {
                prop_assert!(normalized.split('/').all(|s| s != ".."));
                prop_assert!(!normalized.starts_with('/'));
            }
        }

        // Joining a child and rebasing under a root round-trips.
        #[test]
        fn join_then_rebase(parts in prop::collection::vec(segment(), 1..6)) {
            let logical = parts.iter().fold(String::new(), |acc, p| join(&acc, p));
            let root = std::env::temp_dir().join("rescache-cache-prop");
            let absolute = root.join(to_native(&logical));
            let expected = normalize_str(&logical);
            prop_assert_eq!(rebase(&root, &absolute), expected);
        }
    }
}
