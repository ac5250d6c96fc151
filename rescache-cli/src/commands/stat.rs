//! Command to show metadata about a resource.

use crate::error::CliError;
use crate::utils::{
    close_file_system, format_timestamp, kind_label, load_configuration, open_file_system,
    shorten_path, GlobalOptions,
};
use clap::Args;
use std::path::PathBuf;

/// Show metadata about a resource.
#[derive(Args)]
pub struct StatCommand {
    /// Logical path of the resource
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Print JSON instead of human-readable output
    #[arg(long)]
    pub json: bool,
}

impl StatCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let fs = open_file_system(&config)?;

        let props = match fs.props(&self.path) {
            Ok(props) => props,
            Err(e) if e.is_not_found() => {
                if self.json {
                    let value = serde_json::json!({
                        "path": self.path.display().to_string(),
                        "exists": false,
                    });
                    println!("{value}");
                } else if !global.quiet {
                    println!("{}: does not exist", self.path.display());
                }
                close_file_system(&fs)?;
                return Err(CliError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let resolved = fs.resolver().resolve(&self.path)?.into_path_buf();
        let modified = props.modified.map(format_timestamp);

        if self.json {
            let value = serde_json::json!({
                "path": self.path.display().to_string(),
                "exists": true,
                "kind": kind_label(props.is_directory),
                "size": props.size,
                "modified": modified,
                "resolved": resolved.display().to_string(),
            });
            let output = serde_json::to_string_pretty(&value)
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
            println!("{output}");
        } else {
            println!("Path:     {}", self.path.display());
            println!("Kind:     {}", kind_label(props.is_directory));
            println!("Size:     {}", props.size);
            println!("Modified: {}", modified.as_deref().unwrap_or("-"));
            println!("Resolved: {}", shorten_path(&resolved));
        }

        close_file_system(&fs)
    }
}
