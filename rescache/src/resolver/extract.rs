//! Materializing source entries into the cache root.
//!
//! Files are streamed into a temporary file next to their final location and
//! published with a single rename, so no reader ever observes a partially
//! written entry. With caching enabled the first publish wins and later
//! writers discard their copy; with caching disabled each publish replaces
//! the previous one.
//!
//! Directories are materialized eagerly: every child the source lists is
//! extracted, recursively, before the directory is handed out. Without
//! caching, entries the source no longer has are removed from disk, and an
//! entry whose kind changed is replaced.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use super::cache_dir::CacheDirectory;
use super::entry::ResolvedEntry;
use super::logical;
use crate::error::{Error, Result};
use crate::source::{Lookup, ResourceSource};

const TEMP_PREFIX: &str = ".rescache-";
const TEMP_SUFFIX: &str = ".part";

/// One resolver's view of the source and its cache root.
pub(crate) struct Extractor<'a> {
    pub(crate) source: &'a dyn ResourceSource,
    pub(crate) cache: &'a CacheDirectory,
    pub(crate) caching: bool,
    /// Logical paths of directories this resolver has fully materialized.
    pub(crate) completed: &'a Mutex<HashSet<String>>,
}

/// Whether `name` is a temporary file of an extraction in progress.
pub(crate) fn is_partial_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

/// Removes a file or a whole directory tree. Already gone counts as success.
fn remove_entry(path: &Path) -> io::Result<()> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

impl Extractor<'_> {
    /// The cached entry for `logical`, if caching is enabled and it is
    /// already on disk.
    ///
    /// A file is a hit as soon as it exists, since files only appear by
    /// atomic publish. A directory is a hit only once it has been fully
    /// materialized; an ancestor created on the way to a nested file is not.
    pub(crate) fn cached(&self, logical: &str) -> Option<ResolvedEntry> {
        if !self.caching {
            return None;
        }
        let path = self.cache.entry_path(logical);
        let metadata = fs::symlink_metadata(&path).ok()?;
        if metadata.is_file() {
            Some(ResolvedEntry::File(path))
        } else if metadata.is_dir() && self.is_completed(logical) {
            Some(ResolvedEntry::Directory(path))
        } else {
            None
        }
    }

    /// Looks `logical` up in the source and materializes it.
    ///
    /// Returns `None` if the source has nothing under that name. The cache
    /// root must already exist.
    pub(crate) fn materialize(&self, logical: &str) -> Result<Option<ResolvedEntry>> {
        match self.source.lookup(logical)? {
            Lookup::NotFound => {
                if !self.caching && !logical.is_empty() {
                    // An earlier copy must not outlive the source entry.
                    remove_entry(&self.cache.entry_path(logical))
                        .map_err(|e| Error::extraction(logical, e))?;
                }
                Ok(None)
            }
            Lookup::File { reader, length } => {
                log::debug!("Extracting file '{logical}' ({length} bytes)");
                self.extract_file(logical, reader, length).map(Some)
            }
            Lookup::Directory(children) => {
                log::debug!("Extracting directory '{logical}' ({} children)", children.len());
                self.extract_dir(logical, children).map(Some)
            }
        }
    }

    fn extract_file(
        &self,
        logical: &str,
        mut reader: Box<dyn Read + Send>,
        length: u64,
    ) -> Result<ResolvedEntry> {
        let target = self.cache.entry_path(logical);
        let parent = target.parent().unwrap_or(self.cache.root());
        self.create_dirs(parent)
            .map_err(|e| Error::extraction(logical, e))?;

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(parent)
            .map_err(|e| Error::extraction(logical, e))?;
        let copied =
            io::copy(&mut reader, temp.as_file_mut()).map_err(|e| Error::extraction(logical, e))?;
        if copied != length {
            return Err(Error::SourceChanged {
                path: logical.into(),
                details: format!("expected {length} bytes, read {copied}"),
            });
        }

        if self.caching {
            match temp.persist_noclobber(&target) {
                Ok(_) => {}
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    // Another resolver published first; its copy is authoritative.
                    log::debug!("Lost publish race for '{logical}', discarding copy");
                }
                Err(e) => return Err(Error::extraction(logical, e.error)),
            }
        } else {
            if fs::symlink_metadata(&target).is_ok_and(|m| m.is_dir()) {
                remove_entry(&target).map_err(|e| Error::extraction(logical, e))?;
            }
            temp.persist(&target)
                .map_err(|e| Error::extraction(logical, e.error))?;
        }
        Ok(ResolvedEntry::File(target))
    }

    fn extract_dir(&self, logical: &str, children: BTreeSet<String>) -> Result<ResolvedEntry> {
        let target = self.cache.entry_path(logical);
        self.create_dirs(&target)
            .map_err(|e| Error::extraction(logical, e))?;

        for name in &children {
            if !logical::is_child_name(name) {
                log::warn!("Skipping invalid child name {name:?} under '{logical}'");
                continue;
            }
            let child = logical::join(logical, name);
            if self.cached(&child).is_some() {
                continue;
            }
            match self.source.lookup(&child)? {
                Lookup::NotFound => {
                    return Err(Error::SourceChanged {
                        path: child.into(),
                        details: "listed child no longer exists".to_string(),
                    });
                }
                Lookup::File { reader, length } => {
                    self.extract_file(&child, reader, length)?;
                }
                Lookup::Directory(grandchildren) => {
                    self.extract_dir(&child, grandchildren)?;
                }
            }
        }

        if self.caching {
            self.completed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(logical.to_string());
        } else {
            self.prune(&target, &children)
                .map_err(|e| Error::extraction(logical, e))?;
        }
        Ok(ResolvedEntry::Directory(target))
    }

    /// Creates `dir` and its ancestors inside the cache root.
    ///
    /// Without caching, a stale file standing where a directory now belongs
    /// is removed first.
    fn create_dirs(&self, dir: &Path) -> io::Result<()> {
        if !self.caching {
            if let Ok(relative) = dir.strip_prefix(self.cache.root()) {
                let mut current = self.cache.root().to_path_buf();
                for component in relative.components() {
                    current.push(component);
                    match fs::symlink_metadata(&current) {
                        Ok(metadata) if metadata.is_dir() => {}
                        Ok(_) => remove_entry(&current)?,
                        Err(_) => break,
                    }
                }
            }
        }
        fs::create_dir_all(dir)
    }

    /// Deletes entries of `dir` the source no longer lists.
    fn prune(&self, dir: &Path, children: &BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let keep = name
                .to_str()
                .is_some_and(|n| is_partial_name(n) || children.contains(n));
            if !keep {
                log::debug!("Removing stale entry {}", entry.path().display());
                remove_entry(&entry.path())?;
            }
        }
        Ok(())
    }

    fn is_completed(&self, logical: &str) -> bool {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn partials(dir: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                found.extend(partials(&path));
            } else if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_partial_name)
            {
                found.push(path);
            }
        }
        found
    }

    struct Fixture {
        _base: TempDir,
        cache: CacheDirectory,
        source: MemorySource,
        completed: Mutex<HashSet<String>>,
    }

    impl Fixture {
        fn new() -> Self {
            let base = TempDir::new().unwrap();
            let cache = CacheDirectory::reserve(base.path()).unwrap();
            cache.ensure_created().unwrap();
            let source = MemorySource::new();
            source.insert_file("webroot/somefile.html", b"<html><body>blah</body></html>".to_vec());
            source.insert_file("webroot/subdir/subfile.html", b"subfile".to_vec());
            source.insert_dir("webroot/empty");
            Self {
                _base: base,
                cache,
                source,
                completed: Mutex::new(HashSet::new()),
            }
        }

        fn extractor(&self, caching: bool) -> Extractor<'_> {
            Extractor {
                source: &self.source,
                cache: &self.cache,
                caching,
                completed: &self.completed,
            }
        }
    }

    #[test]
    fn test_extract_file_creates_parents() {
        let fx = Fixture::new();
        let entry = fx
            .extractor(true)
            .materialize("webroot/subdir/subfile.html")
            .unwrap()
            .unwrap();
        assert!(entry.is_file());
        assert_eq!(fs::read_to_string(entry.path()).unwrap(), "subfile");
    }

    #[test]
    fn test_ancestor_of_file_is_not_a_directory_hit() {
        let fx = Fixture::new();
        let extractor = fx.extractor(true);
        extractor.materialize("webroot/subdir/subfile.html").unwrap();
        assert!(fx.cache.entry_path("webroot").is_dir());
        assert!(extractor.cached("webroot").is_none());
        assert!(extractor.cached("webroot/subdir/subfile.html").is_some());
    }

    #[test]
    fn test_extract_directory_recursively() {
        let fx = Fixture::new();
        let extractor = fx.extractor(true);
        let entry = extractor.materialize("webroot").unwrap().unwrap();
        assert!(entry.is_dir());
        assert!(fx.cache.entry_path("webroot/somefile.html").is_file());
        assert!(fx.cache.entry_path("webroot/subdir/subfile.html").is_file());
        assert!(fx.cache.entry_path("webroot/empty").is_dir());
        assert!(extractor.cached("webroot").unwrap().is_dir());
        assert!(extractor.cached("webroot/subdir").unwrap().is_dir());
    }

    #[test]
    fn test_not_found() {
        let fx = Fixture::new();
        assert!(fx.extractor(true).materialize("nothing").unwrap().is_none());
    }

    #[test]
    fn test_first_publish_wins_with_caching() {
        let fx = Fixture::new();
        fx.source.insert_file("foo", b"foo".to_vec());
        let extractor = fx.extractor(true);
        extractor.materialize("foo").unwrap();

        fx.source.insert_file("foo", b"bar".to_vec());
        let entry = extractor.materialize("foo").unwrap().unwrap();
        assert_eq!(fs::read_to_string(entry.path()).unwrap(), "foo");
        assert!(partials(fx.cache.root()).is_empty());
    }

    #[test]
    fn test_latest_publish_wins_without_caching() {
        let fx = Fixture::new();
        fx.source.insert_file("foo", b"foo".to_vec());
        let extractor = fx.extractor(false);
        extractor.materialize("foo").unwrap();

        fx.source.insert_file("foo", b"bar".to_vec());
        let entry = extractor.materialize("foo").unwrap().unwrap();
        assert_eq!(fs::read_to_string(entry.path()).unwrap(), "bar");
        assert!(extractor.cached("foo").is_none());
    }

    #[test]
    fn test_without_caching_removed_children_are_pruned() {
        let fx = Fixture::new();
        let extractor = fx.extractor(false);
        extractor.materialize("webroot").unwrap();
        assert!(fx.cache.entry_path("webroot/subdir/subfile.html").is_file());

        fx.source.remove("webroot/subdir");
        extractor.materialize("webroot").unwrap();
        assert!(fx.cache.entry_path("webroot/somefile.html").is_file());
        assert!(!fx.cache.entry_path("webroot/subdir").exists());
    }

    #[test]
    fn test_without_caching_vanished_file_is_removed() {
        let fx = Fixture::new();
        let extractor = fx.extractor(false);
        extractor.materialize("webroot/somefile.html").unwrap();

        fx.source.remove("webroot/somefile.html");
        assert!(extractor.materialize("webroot/somefile.html").unwrap().is_none());
        assert!(!fx.cache.entry_path("webroot/somefile.html").exists());
    }

    #[test]
    fn test_without_caching_file_becomes_directory() {
        let fx = Fixture::new();
        fx.source.insert_file("foo", b"foo".to_vec());
        let extractor = fx.extractor(false);
        assert!(extractor.materialize("foo").unwrap().unwrap().is_file());

        fx.source.remove("foo");
        fx.source.insert_file("foo/bar.txt", b"bar".to_vec());
        let entry = extractor.materialize("foo").unwrap().unwrap();
        assert!(entry.is_dir());
        assert_eq!(
            fs::read_to_string(entry.path().join("bar.txt")).unwrap(),
            "bar"
        );
    }

    #[test]
    fn test_without_caching_nested_file_under_former_file() {
        let fx = Fixture::new();
        fx.source.insert_file("foo", b"foo".to_vec());
        let extractor = fx.extractor(false);
        extractor.materialize("foo").unwrap();

        fx.source.remove("foo");
        fx.source.insert_file("foo/bar.txt", b"bar".to_vec());
        let entry = extractor.materialize("foo/bar.txt").unwrap().unwrap();
        assert_eq!(fs::read_to_string(entry.path()).unwrap(), "bar");
    }

    #[test]
    fn test_without_caching_directory_becomes_file() {
        let fx = Fixture::new();
        let extractor = fx.extractor(false);
        assert!(extractor.materialize("webroot").unwrap().unwrap().is_dir());

        fx.source.remove("webroot");
        fx.source.insert_file("webroot", b"flat".to_vec());
        let entry = extractor.materialize("webroot").unwrap().unwrap();
        assert!(entry.is_file());
        assert_eq!(fs::read_to_string(entry.path()).unwrap(), "flat");
    }

    struct ShortRead;

    impl ResourceSource for ShortRead {
        fn lookup(&self, _path: &str) -> Result<Lookup> {
            Ok(Lookup::File {
                reader: Box::new(io::Cursor::new(b"abc".to_vec())),
                length: 10,
            })
        }

        fn describe(&self) -> String {
            "short".to_string()
        }
    }

    #[test]
    fn test_length_mismatch_leaves_nothing_behind() {
        let fx = Fixture::new();
        let extractor = Extractor {
            source: &ShortRead,
            cache: &fx.cache,
            caching: true,
            completed: &fx.completed,
        };
        let err = extractor.materialize("truncated.bin").unwrap_err();
        assert!(matches!(err, Error::SourceChanged { .. }));
        assert!(!fx.cache.entry_path("truncated.bin").exists());
        assert!(partials(fx.cache.root()).is_empty());
    }

    #[test]
    fn test_concurrent_publish_same_path() {
        let fx = Arc::new(Fixture::new());
        let content: Vec<u8> = (0..256 * 1024).map(|i| (i % 251) as u8).collect();
        fx.source.insert_file("big.bin", content.clone());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let fx = Arc::clone(&fx);
                thread::spawn(move || {
                    let entry = fx.extractor(true).materialize("big.bin").unwrap().unwrap();
                    fs::read(entry.path()).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), content);
        }
    }
}
