//! Ls command implementation.
//!
//! This module implements the `ls` command, which lists the direct children
//! of a resource directory in various formats (table, JSON, CSV, TSV).

use crate::error::CliError;
use crate::utils::{
    close_file_system, format_timestamp, kind_label, load_configuration, open_file_system,
    GlobalOptions,
};
use clap::{Args, ValueEnum};
use rescache::config::OutputFormat as ConfigFormat;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 4] = ["name", "kind", "size", "modified"];

/// List the children of a resource directory.
#[derive(Args)]
pub struct LsCommand {
    /// Logical path of the directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format (defaults to the configured output format)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

/// Output format for the ls command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl From<ConfigFormat> for OutputFormat {
    fn from(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Table => Self::Table,
            ConfigFormat::Json => Self::Json,
            ConfigFormat::Csv => Self::Csv,
            ConfigFormat::Tsv => Self::Tsv,
        }
    }
}

/// One listed child.
#[derive(Debug, Serialize)]
struct ListEntry {
    name: String,
    kind: &'static str,
    size: u64,
    modified: Option<String>,
    path: PathBuf,
}

impl LsCommand {
    /// Execute the ls command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load configuration
        let config = load_configuration(global)?;
        let format = self
            .format
            .or_else(|| config.output_format.map(OutputFormat::from))
            .unwrap_or(OutputFormat::Table);

        // 2. Resolve and list
        let fs = open_file_system(&config)?;
        let mut entries = Vec::new();
        for child in fs.read_dir(&self.path)? {
            let metadata = std::fs::metadata(&child)?;
            entries.push(ListEntry {
                name: child
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                kind: kind_label(metadata.is_dir()),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
                modified: metadata.modified().ok().map(format_timestamp),
                path: child,
            });
        }

        // 3. Format and output to stdout
        match format {
            OutputFormat::Table => format_as_table(&entries)?,
            OutputFormat::Json => format_as_json(&entries)?,
            OutputFormat::Csv => format_as_delimited(&entries, b',')?,
            OutputFormat::Tsv => format_as_delimited(&entries, b'\t')?,
        }

        close_file_system(&fs)
    }
}

/// Format entries as a human-readable table.
fn format_as_table(entries: &[ListEntry]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for entry in entries {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}",
            entry.name,
            entry.kind,
            entry.size,
            entry.modified.as_deref().unwrap_or("-"),
        )?;
    }

    Ok(())
}

/// Format entries as JSON.
fn format_as_json(entries: &[ListEntry]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    serde_json::to_writer_pretty(&mut handle, entries)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    writeln!(handle)?;

    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// Format entries as delimited output (CSV or TSV).
fn format_as_delimited(entries: &[ListEntry], delimiter: u8) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(handle);

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;
    for entry in entries {
        writer
            .write_record([
                entry.name.as_str(),
                entry.kind,
                &entry.size.to_string(),
                entry.modified.as_deref().unwrap_or(""),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_format_conversion() {
        assert_eq!(OutputFormat::from(ConfigFormat::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(ConfigFormat::Tsv), OutputFormat::Tsv);
        assert_eq!(OutputFormat::from(ConfigFormat::Table), OutputFormat::Table);
        assert_eq!(OutputFormat::from(ConfigFormat::Csv), OutputFormat::Csv);
    }
}
