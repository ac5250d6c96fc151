//! Configuration validation.
//!
//! Checks the paths a configuration names before a resolver is built from
//! it, so that mistakes surface as configuration errors instead of failed
//! resolutions later on.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::path::Path;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use rescache::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty `file_cache_dir`, a
    /// `file_cache_dir` that exists but is not a directory, or an empty or
    /// duplicated source entry.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref dir) = config.file_cache_dir {
            Self::validate_cache_dir(dir)?;
        }

        if let Some(ref sources) = config.sources {
            for (index, source) in sources.iter().enumerate() {
                if source.as_os_str().is_empty() {
                    return Err(Error::Validation {
                        field: format!("sources[{index}]"),
                        message: "Source path must not be empty".into(),
                    });
                }
                if sources[..index].contains(source) {
                    return Err(Error::Validation {
                        field: format!("sources[{index}]"),
                        message: format!("Duplicate source: {}", source.display()),
                    });
                }
            }
        }

        Ok(())
    }

    fn validate_cache_dir(dir: &Path) -> Result<()> {
        if dir.as_os_str().is_empty() {
            return Err(Error::Validation {
                field: "file_cache_dir".into(),
                message: "Cache directory must not be empty".into(),
            });
        }
        if dir.exists() && !dir.is_dir() {
            return Err(Error::Validation {
                field: "file_cache_dir".into(),
                message: format!("{} exists but is not a directory", dir.display()),
            });
        }
        Ok(())
    }
}
