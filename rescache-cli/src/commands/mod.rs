//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `cat`: Write a resource's bytes to stdout
//! - `ls`: List the children of a resource directory
//! - `stat`: Show metadata about a resource
//! - `resolve`: Print the on-disk path a resource resolves to
//! - `extract`: Copy a resource or resource tree out of the cache
//! - `show_config`: Print the effective configuration
//! - `validate`: Validate a configuration file
//! - `completions`: Generate shell completion scripts

pub mod cat;
pub mod completions;
pub mod extract;
pub mod ls;
pub mod resolve;
pub mod show_config;
pub mod stat;
pub mod validate;

pub use cat::CatCommand;
pub use completions::CompletionsCommand;
pub use extract::ExtractCommand;
pub use ls::LsCommand;
pub use resolve::ResolveCommand;
pub use show_config::ShowConfigCommand;
pub use stat::StatCommand;
pub use validate::ValidateCommand;
