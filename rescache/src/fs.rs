//! Blocking file operations over resolved paths.
//!
//! [`FileSystem`] passes every path through its [`FileResolver`] first, so
//! resources from the source can be read, listed and opened with ordinary
//! file APIs. When a path does not resolve, the literal path is used on the
//! real filesystem instead, which keeps absolute paths outside the cache
//! working as plain files.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::resolver::extract::is_partial_name;
use crate::resolver::{FileResolver, ResolvedEntry};

/// Metadata about a resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProps {
    /// Whether the path is a directory.
    pub is_directory: bool,
    /// Whether the path is a regular file.
    pub is_regular_file: bool,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, where the platform reports one.
    pub modified: Option<SystemTime>,
}

/// File operations that see through the resolver.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rescache::fs::FileSystem;
/// use rescache::resolver::FileResolver;
/// use rescache::source::MemorySource;
///
/// let source = MemorySource::new();
/// source.insert_file("webroot/subdir/subfile.html", b"<html><body>subfile</body></html>".to_vec());
/// source.insert_dir("webroot/subdir/subdir2");
///
/// let base = tempfile::tempdir().unwrap();
/// let resolver = FileResolver::builder(source).cache_dir_base(base.path()).build().unwrap();
/// let fs = FileSystem::new(Arc::new(resolver));
///
/// let content = fs.read_to_string("webroot/subdir/subfile.html").unwrap();
/// assert_eq!(content, "<html><body>subfile</body></html>");
/// assert_eq!(fs.read_dir("webroot/subdir").unwrap().len(), 2);
/// assert!(fs.read_dir("webroot/missing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct FileSystem {
    resolver: Arc<FileResolver>,
}

impl FileSystem {
    /// Creates a file system over `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<FileResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver paths go through.
    #[must_use]
    pub fn resolver(&self) -> &Arc<FileResolver> {
        &self.resolver
    }

    /// Reads a whole file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if nothing exists at `path`, or the
    /// resolution or I/O error otherwise.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let real = self.real_path(path)?;
        fs::read(&real).map_err(|e| not_found(path, e))
    }

    /// Reads a whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// As [`read_file`](Self::read_file); invalid UTF-8 is reported as an
    /// I/O error.
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let real = self.real_path(path)?;
        fs::read_to_string(&real).map_err(|e| not_found(path, e))
    }

    /// Lists the direct children of a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if nothing exists at `path` and
    /// [`Error::InvalidPath`] if it is not a directory.
    pub fn read_dir(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        let dir = match self.resolver.resolve(path)? {
            ResolvedEntry::Directory(dir) => dir,
            ResolvedEntry::File(_) => return Err(not_a_directory(path)),
            ResolvedEntry::Missing(literal) => match fs::metadata(&literal) {
                Ok(metadata) if metadata.is_dir() => literal,
                Ok(_) => return Err(not_a_directory(path)),
                Err(e) => return Err(not_found(path, e)),
            },
        };

        let mut children = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| not_found(path, e))? {
            let entry = entry?;
            if is_partial_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            children.push(entry.path());
        }
        children.sort();
        Ok(children)
    }

    /// Whether anything exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool> {
        Ok(match self.resolver.resolve(path)? {
            ResolvedEntry::Missing(literal) => literal.exists(),
            _ => true,
        })
    }

    /// Metadata about `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if nothing exists at `path`.
    pub fn props(&self, path: impl AsRef<Path>) -> Result<FileProps> {
        let path = path.as_ref();
        let real = self.real_path(path)?;
        let metadata = fs::metadata(&real).map_err(|e| not_found(path, e))?;
        Ok(FileProps {
            is_directory: metadata.is_dir(),
            is_regular_file: metadata.is_file(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    /// Opens a file for reading, e.g. to send it over a socket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if nothing exists at `path`.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<File> {
        let path = path.as_ref();
        let real = self.real_path(path)?;
        File::open(&real).map_err(|e| not_found(path, e))
    }

    fn real_path(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.resolver.resolve(path)?.into_path_buf())
    }
}

fn not_found(path: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::PathNotFound {
            path: path.to_path_buf(),
        }
    } else {
        Error::Io(e)
    }
}

fn not_a_directory(path: &Path) -> Error {
    Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "not a directory".to_string(),
    }
}
