//! Common test utilities for integration tests.
//!
//! This module provides the resource fixture shared by the integration
//! tests, in each of the forms a resource source can take.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rescache::{DirectorySource, FileResolver, MemorySource};
use tempfile::TempDir;

/// Files of the standard fixture tree and their contents.
pub const FIXTURE_FILES: &[(&str, &str)] = &[
    ("afile.html", "<html><body>afile</body></html>"),
    ("afile with spaces.html", "<html><body>afile with spaces</body></html>"),
    ("afilewithspaceatend ", "afilewithspaceatend"),
    ("webroot/somefile.html", "<html><body>blah</body></html>"),
    ("webroot/subdir/subfile.html", "<html><body>subfile</body></html>"),
    ("webroot/subdir/subdir2/subfile2.html", "<html><body>subfile2</body></html>"),
    ("a/a.txt", "a"),
    ("b/b.txt", "b"),
    ("tree/a/b.txt", "b.txt"),
    ("tree/a/b/c.txt", "c.txt"),
];

/// Writes the fixture tree under `root`.
#[allow(dead_code)]
pub fn write_fixture_tree(root: &Path) -> std::io::Result<()> {
    for (path, content) in FIXTURE_FILES {
        let target = root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, content)?;
    }
    Ok(())
}

/// The fixture tree as an in-memory source.
#[allow(dead_code)]
pub fn memory_fixture() -> MemorySource {
    let source = MemorySource::new();
    for (path, content) in FIXTURE_FILES {
        source.insert_file(path, content.as_bytes().to_vec());
    }
    source
}

/// Writes the fixture tree as a gzip-compressed tar archive at `path`.
#[allow(dead_code)]
pub fn write_fixture_archive(path: &Path) -> std::io::Result<()> {
    let file = fs::File::create(path)?;
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in FIXTURE_FILES {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, name, content.as_bytes())?;
    }
    builder.into_inner()?.finish()?.flush()
}

/// A fixture on disk plus a scratch directory for cache roots.
#[allow(dead_code)]
pub struct TestEnv {
    /// Directory holding the fixture tree.
    pub resources: TempDir,
    /// Base directory cache roots are created in.
    pub cache_base: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    /// Creates the fixture tree and an empty cache base.
    pub fn new() -> Self {
        let resources = TempDir::new().unwrap();
        write_fixture_tree(resources.path()).unwrap();
        Self {
            resources,
            cache_base: TempDir::new().unwrap(),
        }
    }

    /// A caching resolver over the on-disk fixture.
    pub fn resolver(&self) -> FileResolver {
        self.resolver_with(true)
    }

    /// A resolver over the on-disk fixture with caching set as given.
    pub fn resolver_with(&self, caching: bool) -> FileResolver {
        FileResolver::builder(DirectorySource::new(self.resources.path()))
            .cache_dir_base(self.cache_base.path())
            .caching_enabled(caching)
            .build()
            .unwrap()
    }

    /// Number of entries currently in the cache base.
    pub fn cache_roots(&self) -> Vec<PathBuf> {
        fs::read_dir(self.cache_base.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}

/// Names of `paths`, for comparing directory listings.
#[allow(dead_code)]
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}
