//! Resolution of logical paths into the on-disk cache.
//!
//! This module contains the [`FileResolver`] and the pieces it is built
//! from: the owned [`CacheDirectory`], logical path handling, and the
//! extraction engine that copies entries out of a resource source.

pub mod cache_dir;
pub mod entry;
pub(crate) mod extract;
pub mod file_resolver;
pub mod logical;
pub mod options;

pub use cache_dir::{CacheDirectory, CACHE_DIR_PREFIX};
pub use entry::ResolvedEntry;
pub use file_resolver::{FileResolver, FileResolverBuilder};
pub use options::FileSystemOptions;
