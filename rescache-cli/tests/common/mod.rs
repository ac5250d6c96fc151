//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - A resource fixture on disk and as a tar archive
//! - Command builder helpers for common patterns

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Files of the resource fixture and their contents.
pub const FIXTURE_FILES: &[(&str, &str)] = &[
    ("index.html", "<html><body>index</body></html>"),
    ("webroot/somefile.html", "<html><body>blah</body></html>"),
    ("webroot/subdir/subfile.html", "<html><body>subfile</body></html>"),
    ("tree/a/b.txt", "b.txt"),
    ("tree/a/b/c.txt", "c.txt"),
];

/// Test environment with an isolated data directory and cache base.
///
/// Commands run with the temporary directory as their working directory,
/// so no configuration file outside the test is ever picked up.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Directory holding the user configuration
    pub data_dir: PathBuf,
    /// Directory the fixture tree is written to
    pub resources: PathBuf,
    /// Directory cache roots are created in
    pub cache_base: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with the fixture tree on disk.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("rescache-data");
        let resources = temp_path.join("resources");
        let cache_base = temp_path.join("cache");
        fs::create_dir_all(&cache_base).expect("Failed to create cache base");

        for (path, content) in FIXTURE_FILES {
            let target = resources.join(path);
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(target, content).unwrap();
        }

        Self {
            temp_dir,
            temp_path,
            data_dir,
            resources,
            cache_base,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// The working directory and data directory are still isolated, and
    /// `RESCACHE_*` variables from the outer environment are cleared.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("rescache").expect("Failed to find rescache binary");
        cmd.current_dir(&self.temp_path)
            .env("RESCACHE_DATA_DIR", &self.data_dir)
            .env_remove("RESCACHE_SOURCES")
            .env_remove("RESCACHE_CACHE_DIR_BASE")
            .env_remove("RESCACHE_DISABLE_FILE_CACHING")
            .env_remove("RESCACHE_DISABLE_CP_RESOLVING")
            .env_remove("RESCACHE_LOG_MODE");
        cmd
    }

    /// Get a command builder over the fixture tree.
    ///
    /// This is a convenience method that returns a Command with:
    /// - The fixture directory as the only source
    /// - The cache base set to this environment's cache directory
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--source")
            .arg(&self.resources)
            .arg("--cache-dir")
            .arg(&self.cache_base);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write the fixture tree as a tar archive and return its path.
    pub fn write_archive(&self, name: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        let mut builder = tar::Builder::new(fs::File::create(&path).unwrap());
        builder.append_dir_all(".", &self.resources).unwrap();
        builder.finish().unwrap();
        path
    }

    /// Entries left in the cache base.
    pub fn cache_roots(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.cache_base)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    /// Write a configuration file relative to the temp path.
    pub fn write_config(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
