//! Resource source backed by a packaged tar archive.
//!
//! The archive is read once when the source is opened and indexed in memory,
//! so lookups never touch the archive file again. Gzip-compressed archives
//! (`.tar.gz`, `.tgz`) are decompressed transparently.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use tar::EntryType;

use super::tree::EntryTree;
use super::{Lookup, ResourceSource};
use crate::error::{Error, Result};
use crate::resolver::logical;

/// Serves resources packed inside a tar archive.
///
/// Only regular files and directories are served. Symbolic links, hard
/// links and device entries are skipped, as are entries whose names would
/// escape the archive root. Directories that are only implied by file
/// entries are synthesized.
///
/// # Examples
///
/// ```no_run
/// use rescache::source::{ArchiveSource, ResourceSource};
///
/// let source = ArchiveSource::open("bundle.tar.gz").unwrap();
/// assert!(source.lookup("webroot").unwrap().is_found());
/// ```
#[derive(Debug)]
pub struct ArchiveSource {
    path: PathBuf,
    tree: EntryTree,
}

impl ArchiveSource {
    /// Opens and indexes the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not a valid tar
    /// stream, or contains an entry that is both a file and a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);
        if is_gzip(path) {
            Self::from_reader(path, GzDecoder::new(file))
        } else {
            Self::from_reader(path, file)
        }
    }

    /// Indexes a tar stream. `origin` is only used in messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not a valid tar archive.
    pub fn from_reader(origin: impl AsRef<Path>, reader: impl Read) -> Result<Self> {
        let origin = origin.as_ref().to_path_buf();
        let archive_error = |e: io::Error| Error::Archive {
            path: origin.clone(),
            reason: e.to_string(),
        };

        let mut tree = EntryTree::new();
        let mut archive = tar::Archive::new(reader);
        for entry in archive.entries().map_err(archive_error)? {
            let mut entry = entry.map_err(archive_error)?;
            let entry_path = entry.path().map_err(archive_error)?.into_owned();
            let Some(name) = logical::normalize(&entry_path) else {
                log::debug!("Skipping archive entry outside root: {}", entry_path.display());
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let inserted = match entry.header().entry_type() {
                EntryType::Regular | EntryType::Continuous => {
                    let mut content = Vec::with_capacity(entry.size().try_into().unwrap_or(0));
                    entry.read_to_end(&mut content).map_err(archive_error)?;
                    tree.insert_file(&name, Arc::from(content))
                }
                EntryType::Directory => tree.insert_dir(&name),
                other => {
                    log::debug!("Skipping {other:?} archive entry {name}");
                    continue;
                }
            };
            inserted.map_err(|conflict| Error::Archive {
                path: origin.clone(),
                reason: format!("'{}' is both a file and a directory", conflict.path),
            })?;
        }

        log::debug!("Indexed {} entries from {}", tree.len(), origin.display());
        Ok(Self { path: origin, tree })
    }

    /// The archive this source was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of indexed entries, including synthesized directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the archive holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }
}

/// Whether `path` names a gzip-compressed archive.
#[must_use]
pub fn is_gzip(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Whether `path` looks like an archive this source can open.
#[must_use]
pub fn is_archive(path: &Path) -> bool {
    is_gzip(path)
        || path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tar"))
}

impl ResourceSource for ArchiveSource {
    fn lookup(&self, path: &str) -> Result<Lookup> {
        let logical = logical::normalize_str(path).ok_or_else(|| Error::InvalidPath {
            path: path.into(),
            reason: "not a logical path".to_string(),
        })?;
        Ok(self.tree.lookup(&logical))
    }

    fn describe(&self) -> String {
        format!("archive {}", self.path.display())
    }
}
