//! The file resolver.
//!
//! [`FileResolver`] turns logical resource paths into real filesystem paths,
//! extracting from its [`ResourceSource`] into a private cache root on
//! demand. It is safe to share between threads; unrelated paths are
//! extracted in parallel without any global lock.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use super::cache_dir::CacheDirectory;
use super::entry::ResolvedEntry;
use super::extract::Extractor;
use super::logical;
use super::options::FileSystemOptions;
use crate::error::{Error, Result};
use crate::source::ResourceSource;

/// Resolves logical paths to materialized files and directories.
///
/// # Path handling
///
/// - The empty path resolves to the cache root, which is created if needed.
/// - Relative paths are looked up in the source. Paths containing `..` are
///   never looked up and come back as [`ResolvedEntry::Missing`].
/// - Absolute paths inside the cache root are rebased to their logical path
///   and resolved as if requested by that name. All other absolute paths
///   come back as [`ResolvedEntry::Missing`].
///
/// A missing entry always carries the literal requested path.
///
/// # Lifecycle
///
/// [`close`](Self::close) waits for resolutions in flight, then removes the
/// cache root. Every later resolution fails with [`Error::ResolverClosed`].
/// Dropping the resolver closes it.
///
/// # Examples
///
/// ```
/// use rescache::resolver::FileResolver;
/// use rescache::source::MemorySource;
///
/// let source = MemorySource::new();
/// source.insert_file("webroot/somefile.html", b"<html><body>blah</body></html>".to_vec());
///
/// let base = tempfile::tempdir().unwrap();
/// let resolver = FileResolver::builder(source)
///     .cache_dir_base(base.path())
///     .build()
///     .unwrap();
///
/// let entry = resolver.resolve("webroot/somefile.html").unwrap();
/// assert!(entry.is_file());
/// assert!(entry.path().starts_with(resolver.cache_root_path().unwrap()));
///
/// let missing = resolver.resolve("doesnotexist.txt").unwrap();
/// assert!(!missing.exists());
/// assert_eq!(missing.path(), std::path::Path::new("doesnotexist.txt"));
///
/// resolver.close().unwrap();
/// assert!(resolver.resolve("webroot/somefile.html").is_err());
/// ```
pub struct FileResolver {
    source: Box<dyn ResourceSource>,
    options: FileSystemOptions,
    cache: CacheDirectory,
    completed: Mutex<HashSet<String>>,
    closed: AtomicBool,
    // Resolutions hold a read guard for their whole duration; close takes
    // the write guard before removing the cache root.
    lifecycle: RwLock<()>,
}

impl FileResolver {
    /// Creates a resolver over `source`.
    ///
    /// The cache root name is reserved immediately but nothing is written to
    /// disk until a resolution needs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory base cannot be made absolute.
    pub fn new(source: impl ResourceSource + 'static, options: FileSystemOptions) -> Result<Self> {
        Self::from_boxed(Box::new(source), options)
    }

    fn from_boxed(source: Box<dyn ResourceSource>, options: FileSystemOptions) -> Result<Self> {
        let cache = CacheDirectory::reserve(&options.file_cache_dir)?;
        log::debug!(
            "File resolver over {} (caching {}, source lookups {})",
            source.describe(),
            if options.file_caching_enabled { "on" } else { "off" },
            if options.class_path_resolving_enabled { "on" } else { "off" },
        );
        Ok(Self {
            source,
            options,
            cache,
            completed: Mutex::new(HashSet::new()),
            closed: AtomicBool::new(false),
            lifecycle: RwLock::new(()),
        })
    }

    /// Starts building a resolver over `source` with default options.
    pub fn builder(source: impl ResourceSource + 'static) -> FileResolverBuilder {
        FileResolverBuilder {
            source: Box::new(source),
            options: FileSystemOptions::new(),
        }
    }

    /// Resolves `path` to an entry on disk.
    ///
    /// Blocks while anything needs to be extracted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolverClosed`] after [`close`](Self::close), or an
    /// extraction error if the source cannot be read or the cache cannot be
    /// written. Failures are never remembered; the next call retries.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<ResolvedEntry> {
        let requested = path.as_ref();
        if self.is_closed() {
            return Err(Error::ResolverClosed);
        }
        let _guard = self.lifecycle.read().unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            return Err(Error::ResolverClosed);
        }

        let missing = || -> Result<ResolvedEntry> { Ok(ResolvedEntry::Missing(requested.to_path_buf())) };
        let logical = if requested.is_absolute() {
            match self.cache.rebase(requested) {
                Some(logical) => logical,
                None => return missing(),
            }
        } else {
            match logical::normalize(requested) {
                Some(logical) => logical,
                None => {
                    log::debug!("Not resolving '{}': not a logical path", requested.display());
                    return missing();
                }
            }
        };

        if logical.is_empty() {
            let root = self.cache.ensure_created()?;
            return Ok(ResolvedEntry::Directory(root.to_path_buf()));
        }

        let extractor = self.extractor();
        if let Some(hit) = extractor.cached(&logical) {
            log::debug!("Cache hit for '{logical}'");
            return Ok(hit);
        }
        if !self.options.class_path_resolving_enabled {
            return missing();
        }

        self.cache.ensure_created()?;
        match extractor.materialize(&logical)? {
            Some(entry) => Ok(entry),
            None => missing(),
        }
    }

    /// The cache root, if there is one.
    ///
    /// Returns the root whenever caching is enabled or something has been
    /// materialized, even if the directory itself is only created on first
    /// use. Returns `None` once the resolver is closed.
    #[must_use]
    pub fn cache_root_path(&self) -> Option<PathBuf> {
        if self.is_closed() {
            return None;
        }
        if self.options.file_caching_enabled || self.cache.is_created() {
            Some(self.cache.root().to_path_buf())
        } else {
            None
        }
    }

    /// Closes the resolver and removes its cache root.
    ///
    /// Waits for resolutions already in flight. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the cache root could not be removed. The
    /// resolver is closed regardless.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let _guard = self
            .lifecycle
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        if self.cache.destroy()? {
            log::info!("Removed cache root {}", self.cache.root().display());
        }
        Ok(())
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Whether extracted entries are reused across resolutions.
    #[must_use]
    pub fn is_caching_enabled(&self) -> bool {
        self.options.file_caching_enabled
    }

    /// The options this resolver was built with.
    #[must_use]
    pub fn options(&self) -> &FileSystemOptions {
        &self.options
    }

    /// Describes the underlying source.
    #[must_use]
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    fn extractor(&self) -> Extractor<'_> {
        Extractor {
            source: self.source.as_ref(),
            cache: &self.cache,
            caching: self.options.file_caching_enabled,
            completed: &self.completed,
        }
    }
}

impl Drop for FileResolver {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!(
                "Failed to remove cache root {}: {e}",
                self.cache.root().display()
            );
        }
    }
}

impl std::fmt::Debug for FileResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileResolver")
            .field("source", &self.source.describe())
            .field("options", &self.options)
            .field("cache_root", &self.cache.root())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Builder for [`FileResolver`].
///
/// # Examples
///
/// ```
/// use rescache::resolver::FileResolver;
/// use rescache::source::MemorySource;
///
/// let resolver = FileResolver::builder(MemorySource::new())
///     .caching_enabled(false)
///     .build()
///     .unwrap();
/// assert!(!resolver.is_caching_enabled());
/// assert!(resolver.cache_root_path().is_none());
/// ```
#[must_use]
pub struct FileResolverBuilder {
    source: Box<dyn ResourceSource>,
    options: FileSystemOptions,
}

impl FileResolverBuilder {
    /// Enables or disables caching.
    pub fn caching_enabled(mut self, enabled: bool) -> Self {
        self.options.file_caching_enabled = enabled;
        self
    }

    /// Enables or disables source lookups for relative paths.
    pub fn class_path_resolving_enabled(mut self, enabled: bool) -> Self {
        self.options.class_path_resolving_enabled = enabled;
        self
    }

    /// Sets the directory the cache root is created in.
    pub fn cache_dir_base(mut self, base: impl AsRef<Path>) -> Self {
        self.options.file_cache_dir = base.as_ref().to_path_buf();
        self
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: FileSystemOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the resolver.
    ///
    /// # Errors
    ///
    /// See [`FileResolver::new`].
    pub fn build(self) -> Result<FileResolver> {
        FileResolver::from_boxed(self.source, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Lookup, MemorySource, MockResourceSource};
    use mockall::predicate::eq;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn resolver_with(source: impl ResourceSource + 'static, base: &TempDir) -> FileResolver {
        FileResolver::builder(source)
            .cache_dir_base(base.path())
            .build()
            .unwrap()
    }

    #[test]
    fn test_cache_hit_skips_source() {
        let base = TempDir::new().unwrap();
        let mut source = MockResourceSource::new();
        source
            .expect_lookup()
            .with(eq("afile.html"))
            .times(1)
            .returning(|_| Ok(Lookup::from_bytes(b"<html><body>afile</body></html>".to_vec())));
        source.expect_describe().return_const("mock".to_string());

        let resolver = resolver_with(source, &base);
        let first = resolver.resolve("afile.html").unwrap();
        let second = resolver.resolve("afile.html").unwrap();
        assert_eq!(first, second);
        assert_eq!(
            fs::read_to_string(second.path()).unwrap(),
            "<html><body>afile</body></html>"
        );
    }

    #[test]
    fn test_closed_resolver_does_no_lookups() {
        let base = TempDir::new().unwrap();
        let mut source = MockResourceSource::new();
        source.expect_lookup().never();
        source.expect_describe().return_const("mock".to_string());

        let resolver = resolver_with(source, &base);
        resolver.close().unwrap();
        assert!(resolver.resolve("afile.html").unwrap_err().is_closed());
        assert!(resolver.resolve("").unwrap_err().is_closed());
        assert!(resolver.cache_root_path().is_none());
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_is_not_negatively_cached() {
        let base = TempDir::new().unwrap();
        let mut source = MockResourceSource::new();
        source
            .expect_lookup()
            .with(eq("somedir"))
            .times(2)
            .returning(|_| Ok(Lookup::NotFound));
        source.expect_describe().return_const("mock".to_string());

        let resolver = resolver_with(source, &base);
        for _ in 0..2 {
            let entry = resolver.resolve("somedir").unwrap();
            assert_eq!(entry, ResolvedEntry::Missing(PathBuf::from("somedir")));
        }
    }

    #[test]
    fn test_vanished_child_fails_then_retries() {
        let base = TempDir::new().unwrap();
        let mut source = MockResourceSource::new();
        source
            .expect_lookup()
            .with(eq("dir"))
            .returning(|_| Ok(Lookup::Directory(BTreeSet::from(["gone.txt".to_string()]))));
        source
            .expect_lookup()
            .with(eq("dir/gone.txt"))
            .times(2)
            .returning(|_| Ok(Lookup::NotFound));
        source.expect_describe().return_const("mock".to_string());

        let resolver = resolver_with(source, &base);
        for _ in 0..2 {
            let err = resolver.resolve("dir").unwrap_err();
            assert!(matches!(err, Error::SourceChanged { .. }));
        }
    }

    #[test]
    fn test_parent_references_are_never_looked_up() {
        let base = TempDir::new().unwrap();
        let mut source = MockResourceSource::new();
        source.expect_lookup().never();
        source.expect_describe().return_const("mock".to_string());

        let resolver = resolver_with(source, &base);
        let entry = resolver.resolve("webroot/../../etc/passwd").unwrap();
        assert_eq!(entry.path(), Path::new("webroot/../../etc/passwd"));
        assert!(!entry.exists());
    }

    #[test]
    fn test_class_path_resolving_disabled() {
        let base = TempDir::new().unwrap();
        let source = MemorySource::new();
        source.insert_file("afile.html", b"afile".to_vec());
        let resolver = FileResolver::builder(source)
            .cache_dir_base(base.path())
            .class_path_resolving_enabled(false)
            .build()
            .unwrap();

        assert!(!resolver.resolve("afile.html").unwrap().exists());
        assert!(resolver.resolve("").unwrap().is_dir());
    }

    #[test]
    fn test_cache_root_path_without_caching() {
        let base = TempDir::new().unwrap();
        let source = MemorySource::new();
        source.insert_file("foo", b"foo".to_vec());
        let resolver = FileResolver::builder(source)
            .cache_dir_base(base.path())
            .caching_enabled(false)
            .build()
            .unwrap();

        assert!(resolver.cache_root_path().is_none());
        let entry = resolver.resolve("foo").unwrap();
        let root = resolver.cache_root_path().unwrap();
        assert!(entry.path().starts_with(&root));
    }

    #[test]
    fn test_close_twice_and_drop() {
        let base = TempDir::new().unwrap();
        let source = MemorySource::new();
        source.insert_file("a/a.txt", b"a".to_vec());
        let resolver = resolver_with(source, &base);
        let root = resolver.resolve("").unwrap().into_path_buf();
        assert!(root.is_dir());

        resolver.close().unwrap();
        resolver.close().unwrap();
        assert!(!root.exists());
        assert!(resolver.is_closed());

        let source = MemorySource::new();
        source.insert_file("a/a.txt", b"a".to_vec());
        let dropped = resolver_with(source, &base);
        let root = dropped.resolve("a/a.txt").unwrap();
        let root = root.path().parent().unwrap().parent().unwrap().to_path_buf();
        drop(dropped);
        assert!(!root.exists());
    }
}
