#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # rescache
//!
//! A library for materializing packaged resources into a private on-disk
//! cache, so that ordinary file APIs can open, list and send them.
//!
//! Resources come from a [`ResourceSource`]: a directory tree, a tar
//! archive, memory, or an ordered stack of those. A [`FileResolver`] maps a
//! logical path such as `webroot/index.html` to a real file under its own
//! uniquely named cache root, extracting on first use, and removes the whole
//! cache root when it is closed.
//!
//! ## Core Types
//!
//! - [`FileResolver`] and [`ResolvedEntry`]: resolution and its outcome
//! - [`ResourceSource`] and its implementations in [`source`]
//! - [`FileSystem`]: blocking file operations through a resolver
//! - [`Config`] and [`ConfigBuilder`]: layered configuration
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use rescache::{FileResolver, MemorySource};
//!
//! let source = MemorySource::new();
//! source.insert_file("webroot/index.html", b"<html></html>".to_vec());
//!
//! let base = tempfile::tempdir().unwrap();
//! let resolver = FileResolver::builder(source)
//!     .cache_dir_base(base.path())
//!     .build()
//!     .unwrap();
//!
//! let dir = resolver.resolve("webroot").unwrap();
//! assert!(dir.is_dir());
//! assert!(dir.path().join("index.html").is_file());
//!
//! let root = resolver.cache_root_path().unwrap();
//! resolver.close().unwrap();
//! assert!(!root.exists());
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod resolver;
pub mod source;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use fs::{FileProps, FileSystem};
pub use logging::{init_logger, LogLevel, Logger};
pub use resolver::{FileResolver, FileResolverBuilder, FileSystemOptions, ResolvedEntry};
pub use source::{
    ArchiveSource, DirectorySource, LayeredSource, Lookup, MemorySource, ResourceSource,
};
