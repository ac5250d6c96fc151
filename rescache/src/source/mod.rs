//! Resource sources.
//!
//! A [`ResourceSource`] maps a logical path to raw content: either nothing,
//! a single readable resource of known length, or a directory whose
//! immediate children can be enumerated. The resolver only ever talks to
//! this trait, so where the bytes actually live (a directory tree, entries
//! inside an archive, memory) is invisible to it.
//!
//! Logical paths passed to [`ResourceSource::lookup`] are always normalized:
//! `/`-separated, relative, free of `.` and `..` components. The empty
//! string names the root of the source.
//!
//! # Examples
//!
//! ```
//! use rescache::source::{Lookup, MemorySource, ResourceSource};
//!
//! let source = MemorySource::new();
//! source.insert_file("webroot/index.html", b"<html></html>".to_vec());
//!
//! match source.lookup("webroot").unwrap() {
//!     Lookup::Directory(children) => assert!(children.contains("index.html")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(!source.lookup("missing.txt").unwrap().is_found());
//! ```

pub mod archive;
pub mod directory;
pub mod layered;
pub mod memory;
mod tree;

use std::collections::BTreeSet;
use std::fmt;
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::error::Result;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;
pub use layered::LayeredSource;
pub use memory::MemorySource;

/// Outcome of looking up a logical path in a [`ResourceSource`].
pub enum Lookup {
    /// Nothing exists at the path.
    NotFound,
    /// A single resource.
    File {
        /// Stream over the resource's bytes.
        reader: Box<dyn Read + Send>,
        /// Number of bytes the stream will yield.
        length: u64,
    },
    /// A directory with the names of its immediate children.
    Directory(BTreeSet<String>),
}

impl Lookup {
    /// Builds a file lookup over an in-memory buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescache::source::Lookup;
    ///
    /// let lookup = Lookup::from_bytes(b"hello".to_vec());
    /// assert!(lookup.is_found());
    /// ```
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        let length = bytes.len() as u64;
        Self::File {
            reader: Box::new(Cursor::new(SharedBytes(bytes))),
            length,
        }
    }

    /// Returns `true` unless this is [`Lookup::NotFound`].
    #[must_use]
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NotFound"),
            Self::File { length, .. } => f.debug_struct("File").field("length", length).finish(),
            Self::Directory(children) => f.debug_tuple("Directory").field(children).finish(),
        }
    }
}

/// Cheaply clonable byte buffer usable as a `Cursor` backing store.
#[derive(Clone)]
pub(crate) struct SharedBytes(pub(crate) Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Capability to look up logical paths.
///
/// Implementations must be usable from many threads at once; the resolver
/// calls `lookup` concurrently and recursively (once per directory level it
/// materializes).
#[cfg_attr(test, mockall::automock)]
pub trait ResourceSource: Send + Sync {
    /// Looks up a normalized logical path.
    ///
    /// # Errors
    ///
    /// Returns an error if the source exists but cannot be read. A missing
    /// path is not an error: it is reported as [`Lookup::NotFound`].
    fn lookup(&self, path: &str) -> Result<Lookup>;

    /// Short human-readable description used in log messages.
    fn describe(&self) -> String;
}

impl<T: ResourceSource + ?Sized> ResourceSource for Arc<T> {
    fn lookup(&self, path: &str) -> Result<Lookup> {
        (**self).lookup(path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: ResourceSource + ?Sized> ResourceSource for Box<T> {
    fn lookup(&self, path: &str) -> Result<Lookup> {
        (**self).lookup(path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
