//! Command-line interface for dirtally
//!
//! With no arguments the binary prompts for a root on stdin, exactly like the
//! plain interactive tool. Every flag below is optional.

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;

use crate::config::{OutputFormat, TallyConfig};
use crate::tally::{KeyMode, Tally};

pub mod output;

pub use output::Output;

/// dirtally - count files and bytes per directory, in parallel
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (prompted for on stdin when omitted)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output and warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Key directories by bare name or by path relative to ROOT
    #[arg(long, value_enum)]
    pub key_by: Option<KeyMode>,

    /// Also list directories that hold no regular files
    #[arg(long)]
    pub show_empty: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.quiet);

        let root = match &self.root {
            Some(root) => root.clone(),
            None => PathBuf::from(output.prompt_root(&mut io::stdin().lock())?),
        };

        // A rejected root exits cleanly without touching configuration
        if !root.is_dir() {
            tracing::debug!("Rejected root {}", root.display());
            output.not_a_directory();
            return Ok(());
        }

        let config = TallyConfig::load_with(self.config.as_deref(), Some(self.overrides()))?;
        let settings = config.settings()?;

        let report = Tally::new(settings.tally.key_by).run(&root);
        tracing::info!(
            "Tally of {} finished: {} files, {} bytes, {} failures",
            root.display(),
            report.totals.files,
            report.totals.bytes,
            report.failures.len()
        );

        output.report(&report, settings.report.format, settings.report.show_empty)
    }

    /// Only the flags actually given, so unset ones never mask config files
    fn overrides(&self) -> serde_json::Value {
        let mut tally = serde_json::Map::new();
        let mut report = serde_json::Map::new();

        if let Some(key_by) = self.key_by {
            tally.insert("key_by".to_string(), serde_json::json!(key_by));
        }
        if let Some(format) = self.format {
            report.insert("format".to_string(), serde_json::json!(format));
        }
        if self.show_empty {
            report.insert("show_empty".to_string(), serde_json::Value::Bool(true));
        }

        serde_json::json!({ "tally": tally, "report": report })
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            match verbose {
                0 => tracing_subscriber::EnvFilter::new("warn"),
                1 => tracing_subscriber::EnvFilter::new("info,ignore=warn"),
                2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn"),
                _ => tracing_subscriber::EnvFilter::new("trace"),
            }
        });

    // stdout carries the report; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_prompt() {
        let cli = Cli::parse_from(["dirtally"]);
        assert!(cli.root.is_none());
        assert_eq!(cli.overrides(), serde_json::json!({ "tally": {}, "report": {} }));
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::parse_from([
            "dirtally",
            "/tmp",
            "--key-by",
            "path",
            "--format",
            "json",
            "--show-empty",
        ]);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp")));
        assert_eq!(
            cli.overrides(),
            serde_json::json!({
                "tally": { "key_by": "path" },
                "report": { "format": "json", "show_empty": true }
            })
        );
    }

    #[test]
    fn test_overrides_resolve_through_config() {
        let cli = Cli::parse_from(["dirtally", "--key-by", "path"]);
        let config = TallyConfig::load_with(None, Some(cli.overrides())).unwrap();
        assert_eq!(config.settings().unwrap().tally.key_by, KeyMode::Path);
    }
}
