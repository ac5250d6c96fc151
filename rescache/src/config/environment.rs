//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `RESCACHE_*` environment variables that
//! override configuration file values.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Disables caching when true.
pub const DISABLE_FILE_CACHING_ENV: &str = "RESCACHE_DISABLE_FILE_CACHING";

/// Disables source lookups for relative paths when true.
pub const DISABLE_CP_RESOLVING_ENV: &str = "RESCACHE_DISABLE_CP_RESOLVING";

/// Directory the cache root is created in.
pub const CACHE_DIR_BASE_ENV: &str = "RESCACHE_CACHE_DIR_BASE";

/// Resource sources, separated like `PATH`.
pub const SOURCES_ENV: &str = "RESCACHE_SOURCES";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use rescache::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Sources from `RESCACHE_SOURCES` are searched before sources from
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean variable holds an invalid value or a
    /// path variable is empty.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var(DISABLE_FILE_CACHING_ENV) {
            let disabled = Self::parse_bool(DISABLE_FILE_CACHING_ENV, &val)?;
            config.file_caching_enabled = Some(!disabled);
        }

        if let Ok(val) = env::var(DISABLE_CP_RESOLVING_ENV) {
            let disabled = Self::parse_bool(DISABLE_CP_RESOLVING_ENV, &val)?;
            config.class_path_resolving_enabled = Some(!disabled);
        }

        if let Some(dir) = env::var_os(CACHE_DIR_BASE_ENV) {
            if dir.is_empty() {
                return Err(Error::Validation {
                    field: CACHE_DIR_BASE_ENV.into(),
                    message: "Must not be empty".into(),
                });
            }
            config.file_cache_dir = Some(PathBuf::from(dir));
        }

        if let Some(value) = env::var_os(SOURCES_ENV) {
            let mut sources: Vec<PathBuf> = env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if let Some(existing) = config.sources.take() {
                for path in existing {
                    if !sources.contains(&path) {
                        sources.push(path);
                    }
                }
            }
            config.sources = Some(sources);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    pub(crate) fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}


#[cfg(test)]
#[allow(unused_doc_comments)] // proptest! macro doesn't support doc comments
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn case_variants(word: &'static str) -> impl Strategy<Value = String> {
        prop::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
            word.chars()
                .zip(upper)
                .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    /// Property: boolean parsing is case-insensitive.
    proptest! {
        #[test]
        fn prop_true_words_any_case(
            value in prop_oneof![case_variants("true"), case_variants("yes"), case_variants("on")]
        ) {
            prop_assert!(EnvironmentConfig::parse_bool("test", &value).unwrap());
        }

        #[test]
        fn prop_false_words_any_case(
            value in prop_oneof![case_variants("false"), case_variants("no"), case_variants("off")]
        ) {
            prop_assert!(!EnvironmentConfig::parse_bool("test", &value).unwrap());
        }
    }

    /// Property: anything that is not a known word is rejected.
    proptest! {
        #[test]
        fn prop_unknown_words_rejected(value in "[a-z]{2,8}") {
            let known = ["true", "false", "yes", "no", "on", "off"];
            prop_assume!(!known.contains(&value.as_str()));
            prop_assert!(EnvironmentConfig::parse_bool("test", &value).is_err());
        }
    }
}
