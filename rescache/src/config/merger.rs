//! Configuration merging and precedence handling.
//!
//! Scalar fields are overwritten by higher-precedence sources. Source lists
//! accumulate: a higher-precedence layer's sources are searched first, ahead
//! of the sources it inherits.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use rescache::config::{Config, ConfigMerger};
///
/// let low = Config { file_caching_enabled: Some(true), ..Default::default() };
/// let high = Config { file_caching_enabled: Some(false), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.file_caching_enabled, Some(false));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            log::debug!("Merging configuration from {}", source.path.display());
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Sources: source's entries are prepended, duplicates dropped
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.file_caching_enabled.is_some() {
            target.file_caching_enabled = source.file_caching_enabled;
        }

        if source.class_path_resolving_enabled.is_some() {
            target.class_path_resolving_enabled = source.class_path_resolving_enabled;
        }

        if source.file_cache_dir.is_some() {
            target.file_cache_dir.clone_from(&source.file_cache_dir);
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_sources) = source.sources {
            let mut merged = source_sources.clone();
            if let Some(existing) = target.sources.take() {
                for path in existing {
                    if !merged.contains(&path) {
                        merged.push(path);
                    }
                }
            }
            target.sources = Some(merged);
        }
    }
}
