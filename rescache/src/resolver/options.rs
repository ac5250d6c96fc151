//! Options controlling how a resolver caches and looks up resources.

use std::path::{Path, PathBuf};

/// Configuration read by [`FileResolver`](super::FileResolver).
///
/// # Examples
///
/// ```
/// use rescache::resolver::FileSystemOptions;
///
/// // Defaults: caching on, source lookups on, cache under the temp dir
/// let options = FileSystemOptions::new();
/// assert!(options.file_caching_enabled);
/// assert!(options.class_path_resolving_enabled);
///
/// let options = FileSystemOptions::new()
///     .with_file_caching(false)
///     .with_file_cache_dir("/var/tmp");
/// assert!(!options.file_caching_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemOptions {
    /// Keep extracted entries and serve later resolutions from disk.
    pub file_caching_enabled: bool,
    /// Look relative paths up in the resource source at all.
    pub class_path_resolving_enabled: bool,
    /// Directory the cache root is created in.
    pub file_cache_dir: PathBuf,
}

impl Default for FileSystemOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemOptions {
    /// Creates options with default settings.
    ///
    /// Default settings:
    /// - `file_caching_enabled`: true
    /// - `class_path_resolving_enabled`: true
    /// - `file_cache_dir`: the system temporary directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            file_caching_enabled: true,
            class_path_resolving_enabled: true,
            file_cache_dir: std::env::temp_dir(),
        }
    }

    /// Enables or disables caching of extracted entries.
    #[must_use]
    pub fn with_file_caching(mut self, enabled: bool) -> Self {
        self.file_caching_enabled = enabled;
        self
    }

    /// Enables or disables source lookups for relative paths.
    #[must_use]
    pub fn with_class_path_resolving(mut self, enabled: bool) -> Self {
        self.class_path_resolving_enabled = enabled;
        self
    }

    /// Sets the directory the cache root is created in.
    #[must_use]
    pub fn with_file_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.file_cache_dir = dir.as_ref().to_path_buf();
        self
    }
}
