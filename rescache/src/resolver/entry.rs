//! The outcome of one resolution.

use std::path::{Path, PathBuf};

/// Where a requested path ended up.
///
/// A missing entry carries the literal path that was requested, untouched.
/// An existing entry carries a real filesystem path; for directories every
/// child known to the source at resolution time is already on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEntry {
    /// Nothing exists under this name.
    Missing(PathBuf),
    /// A regular file on disk.
    File(PathBuf),
    /// A fully materialized directory on disk.
    Directory(PathBuf),
}

impl ResolvedEntry {
    /// The path this entry refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Missing(path) | Self::File(path) | Self::Directory(path) => path,
        }
    }

    /// Whether the entry exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        !matches!(self, Self::Missing(_))
    }

    /// Whether the entry is an existing directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Whether the entry is an existing file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Consumes the entry, returning its path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        match self {
            Self::Missing(path) | Self::File(path) | Self::Directory(path) => path,
        }
    }
}

impl AsRef<Path> for ResolvedEntry {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let missing = ResolvedEntry::Missing(PathBuf::from("doesnotexist.txt"));
        assert!(!missing.exists());
        assert!(!missing.is_dir() && !missing.is_file());
        assert_eq!(missing.path(), Path::new("doesnotexist.txt"));

        let dir = ResolvedEntry::Directory(PathBuf::from("/cache/webroot"));
        assert!(dir.exists() && dir.is_dir());
        assert_eq!(dir.into_path_buf(), PathBuf::from("/cache/webroot"));
    }
}
