//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, assembling resource sources, opening a
//! resolver, and output formatting.

use crate::error::CliError;
use rescache::source::archive::is_archive;
use rescache::{
    ArchiveSource, Config, ConfigBuilder, DirectorySource, FileResolver, FileSystem,
    LayeredSource, ResourceSource,
};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)] // verbose is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Sources given on the command line, searched first.
    pub sources: Vec<PathBuf>,

    /// Override the cache directory base.
    pub cache_dir: Option<PathBuf>,

    /// Disable reuse of extracted entries.
    pub disable_caching: bool,

    /// Override the user configuration directory.
    pub data_dir: Option<PathBuf>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref data_dir) = global.data_dir {
        builder = builder.with_data_dir(data_dir);
    }

    let overrides = Config {
        file_caching_enabled: global.disable_caching.then_some(false),
        file_cache_dir: global.cache_dir.clone(),
        sources: (!global.sources.is_empty()).then(|| global.sources.clone()),
        ..Config::default()
    };

    builder
        .with_config(overrides)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open one configured source path.
///
/// Tar archives (`.tar`, `.tar.gz`, `.tgz`) are indexed, directories are
/// served as they are.
fn open_source(path: &Path) -> Result<Box<dyn ResourceSource>, CliError> {
    if path.is_dir() {
        return Ok(Box::new(DirectorySource::new(path)));
    }
    if path.is_file() && is_archive(path) {
        return Ok(Box::new(ArchiveSource::open(path)?));
    }
    if path.exists() {
        return Err(CliError::Config(format!(
            "Unsupported source (expected a directory or tar archive): {}",
            path.display()
        )));
    }
    Err(CliError::Config(format!(
        "Source does not exist: {}",
        path.display()
    )))
}

/// Build the layered source a resolver searches.
///
/// Sources are searched in configuration order. With no sources configured
/// the current directory is the only source.
pub fn build_source(config: &Config) -> Result<LayeredSource, CliError> {
    let mut layers = Vec::new();
    for path in config.sources() {
        layers.push(open_source(path)?);
    }
    if layers.is_empty() {
        layers.push(open_source(&env::current_dir()?)?);
    }
    Ok(LayeredSource::new(layers))
}

/// Open a file system over the configured sources.
pub fn open_file_system(config: &Config) -> Result<FileSystem, CliError> {
    let source = build_source(config)?;
    log::debug!("Resolving through {}", source.describe());
    let resolver = FileResolver::new(source, config.file_system_options())?;
    Ok(FileSystem::new(Arc::new(resolver)))
}

/// Close the resolver behind `fs`, removing its cache root.
pub fn close_file_system(fs: &FileSystem) -> Result<(), CliError> {
    fs.resolver().close().map_err(CliError::from)
}

/// Format a timestamp as RFC 3339.
pub fn format_timestamp(ts: SystemTime) -> String {
    use chrono::{DateTime, SecondsFormat, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Describe an entry kind for display.
pub fn kind_label(is_directory: bool) -> &'static str {
    if is_directory {
        "directory"
    } else {
        "file"
    }
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
