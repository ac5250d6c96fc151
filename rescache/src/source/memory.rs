//! Mutable in-memory resource source.

use std::sync::{Arc, PoisonError, RwLock};

use super::tree::EntryTree;
use super::{Lookup, ResourceSource};
use crate::error::{Error, Result};
use crate::resolver::logical;

/// A resource source held entirely in memory.
///
/// Content can be replaced at any time, which makes this source useful for
/// embedding generated resources and for observing the resolver's caching
/// behavior when the underlying content changes.
///
/// # Examples
///
/// ```
/// use rescache::source::{MemorySource, ResourceSource};
///
/// let source = MemorySource::new();
/// source.insert_file("foo", b"foo".to_vec());
/// source.insert_file("foo", b"bar".to_vec());
/// assert!(source.lookup("foo").unwrap().is_found());
///
/// source.remove("foo");
/// assert!(!source.lookup("foo").unwrap().is_found());
/// ```
#[derive(Debug)]
pub struct MemorySource {
    tree: RwLock<EntryTree>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(EntryTree::new()),
        }
    }

    /// Inserts or replaces a file, creating its parent directories.
    ///
    /// Paths that do not normalize to a logical path (absolute paths, `..`)
    /// or that collide with an existing directory are ignored and reported
    /// with `false`.
    pub fn insert_file(&self, path: &str, bytes: impl Into<Arc<[u8]>>) -> bool {
        let Some(logical) = logical::normalize_str(path) else {
            return false;
        };
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.insert_file(&logical, bytes.into()).is_ok()
    }

    /// Inserts an empty directory, creating its parents.
    pub fn insert_dir(&self, path: &str) -> bool {
        let Some(logical) = logical::normalize_str(path) else {
            return false;
        };
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.insert_dir(&logical).is_ok()
    }

    /// Removes a file or a whole directory subtree.
    pub fn remove(&self, path: &str) -> bool {
        let Some(logical) = logical::normalize_str(path) else {
            return false;
        };
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.remove(&logical)
    }

    /// Number of entries, not counting the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the source holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceSource for MemorySource {
    fn lookup(&self, path: &str) -> Result<Lookup> {
        let logical = logical::normalize_str(path).ok_or_else(|| Error::InvalidPath {
            path: path.into(),
            reason: "not a logical path".to_string(),
        })?;
        Ok(self
            .tree
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(&logical))
    }

    fn describe(&self) -> String {
        format!("memory ({} entries)", self.len())
    }
}
