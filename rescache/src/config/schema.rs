//! Configuration schema definitions.
//!
//! This module defines the configuration structure for rescache: caching
//! behavior, where the cache root lives, and which resource sources a
//! command-line resolver is built over.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::FileSystemOptions;

/// Complete configuration structure.
///
/// Every field is optional so that configuration files and environment
/// variables can be layered; unset fields fall back to the defaults of
/// [`FileSystemOptions`].
///
/// # Examples
///
/// ```
/// use rescache::config::Config;
///
/// let config = Config {
///     file_caching_enabled: Some(false),
///     ..Default::default()
/// };
/// assert!(!config.file_system_options().file_caching_enabled);
/// assert!(config.file_system_options().class_path_resolving_enabled);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Reuse extracted entries across resolutions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_caching_enabled: Option<bool>,

    /// Look relative paths up in the resource sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_path_resolving_enabled: Option<bool>,

    /// Directory the cache root is created in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_cache_dir: Option<PathBuf>,

    /// Resource sources, searched in order: directories or tar archives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<PathBuf>>,

    /// Output format for list commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// The resolver options this configuration describes.
    #[must_use]
    pub fn file_system_options(&self) -> FileSystemOptions {
        let defaults = FileSystemOptions::new();
        FileSystemOptions {
            file_caching_enabled: self
                .file_caching_enabled
                .unwrap_or(defaults.file_caching_enabled),
            class_path_resolving_enabled: self
                .class_path_resolving_enabled
                .unwrap_or(defaults.class_path_resolving_enabled),
            file_cache_dir: self
                .file_cache_dir
                .clone()
                .unwrap_or(defaults.file_cache_dir),
        }
    }

    /// The configured sources, or none.
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        self.sources.as_deref().unwrap_or_default()
    }

    /// A configuration with every field filled in from the defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        let defaults = FileSystemOptions::new();
        Self {
            file_caching_enabled: Some(defaults.file_caching_enabled),
            class_path_resolving_enabled: Some(defaults.class_path_resolving_enabled),
            file_cache_dir: Some(defaults.file_cache_dir),
            sources: Some(Vec::new()),
            output_format: Some(OutputFormat::Table),
        }
    }
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use rescache::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}
