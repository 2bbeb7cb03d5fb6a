//! Terminal output for dirtally
//!
//! The report table keeps a fixed column layout and is never styled, so it
//! stays pipe-friendly. Prompts and warnings around it use `console` styling.

use anyhow::{Context, Result};
use console::style;
use std::io::{self, BufRead, Write};

use crate::config::OutputFormat;
use crate::tally::TallyReport;

const DIRECTORIES_HEADER: &str = "                 -------------[Directories]------------";

/// Output handler for consistent CLI formatting
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Ask for the root on stdout and read one line from `input`
    pub fn prompt_root<R: BufRead>(&self, input: &mut R) -> Result<String> {
        print!("Please insert a root: ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        input
            .read_line(&mut line)
            .context("Failed to read root from standard input")?;

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// The one user-facing failure: the root is not a directory
    pub fn not_a_directory(&self) {
        println!("you must indicate an actual directory");
    }

    /// Print a warning message to stderr
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print the finished report in the requested format
    pub fn report(&self, report: &TallyReport, format: OutputFormat, show_empty: bool) -> Result<()> {
        match format {
            OutputFormat::Text => {
                print!("{}", render_text(report, show_empty));
                if !report.failures.is_empty() {
                    self.warning(&format!(
                        "{} directories could not be fully listed; totals may be low",
                        report.failures.len()
                    ));
                }
            }
            OutputFormat::Json => println!("{}", render_json(report)?),
        }
        io::stdout().flush().context("Failed to flush report")?;
        Ok(())
    }
}

/// Column layout of the text report
pub fn render_text(report: &TallyReport, show_empty: bool) -> String {
    let rows: String = report
        .directories
        .iter()
        .filter(|(_, stats)| show_empty || !stats.is_empty())
        .map(|(dir, stats)| {
            format!(
                "{:>25}: {:>5} files {:>10} bytes\n",
                dir, stats.file_count, stats.total_bytes
            )
        })
        .collect();

    format!(
        "{}\n\n{}\n{:>20}Total: {:>5} files {:>10} bytes | {} folders [{} ms]\n",
        DIRECTORIES_HEADER,
        rows,
        "",
        report.totals.files,
        report.totals.bytes,
        report.totals.directories,
        report.elapsed.as_millis()
    )
}

pub fn render_json(report: &TallyReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}
