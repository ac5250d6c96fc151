//! Resource source backed by a directory tree on disk.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use super::{Lookup, ResourceSource};
use crate::error::{Error, Result};
use crate::resolver::logical;

/// Serves resources from a directory on the local filesystem.
///
/// Symbolic links are never followed: a link anywhere along a logical path
/// makes the path not found, and links are left out of directory listings.
/// This keeps extraction confined to the tree rooted at `root`.
///
/// # Examples
///
/// ```no_run
/// use rescache::source::{DirectorySource, ResourceSource};
///
/// let source = DirectorySource::new("src/test/resources");
/// let lookup = source.lookup("webroot/index.html").unwrap();
/// println!("{lookup:?}");
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this source serves from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metadata for `path` if no component below the root is a symlink.
    fn metadata_without_links(&self, segments: &[&str]) -> io::Result<Option<fs::Metadata>> {
        let mut current = self.root.clone();
        let mut metadata = match fs::metadata(&current) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        for segment in segments {
            if !metadata.is_dir() {
                return Ok(None);
            }
            current.push(segment);
            metadata = match fs::symlink_metadata(&current) {
                Ok(m) => m,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e),
            };
            if metadata.file_type().is_symlink() {
                return Ok(None);
            }
        }
        Ok(Some(metadata))
    }

    fn list(dir: &Path) -> io::Result<BTreeSet<String>> {
        let mut children = BTreeSet::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if !(file_type.is_file() || file_type.is_dir()) {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => {
                    children.insert(name);
                }
                Err(name) => {
                    log::debug!("Skipping non-UTF-8 entry {name:?} in {}", dir.display());
                }
            }
        }
        Ok(children)
    }
}

impl ResourceSource for DirectorySource {
    fn lookup(&self, path: &str) -> Result<Lookup> {
        let logical = logical::normalize_str(path).ok_or_else(|| Error::InvalidPath {
            path: path.into(),
            reason: "not a logical path".to_string(),
        })?;
        let segments: Vec<&str> = logical.split('/').filter(|s| !s.is_empty()).collect();

        let Some(metadata) = self.metadata_without_links(&segments)? else {
            return Ok(Lookup::NotFound);
        };

        let mut target = self.root.clone();
        target.extend(&segments);

        if metadata.is_dir() {
            Ok(Lookup::Directory(Self::list(&target)?))
        } else if metadata.is_file() {
            match File::open(&target) {
                Ok(file) => Ok(Lookup::File {
                    reader: Box::new(file),
                    length: metadata.len(),
                }),
                // Removed between stat and open.
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Lookup::NotFound),
                Err(e) => Err(e.into()),
            }
        } else {
            Ok(Lookup::NotFound)
        }
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}
