//! Configuration management for dirtally
//!
//! Settings are layered with figment: embedded defaults, user and working
//! directory TOML files, `DIRTALLY_*` environment variables, then CLI flags.
//! Every layer is optional; with none of them present the defaults reproduce
//! the plain prompt-and-print behaviour.

use serde::{Deserialize, Serialize};

use crate::tally::KeyMode;

pub mod core;

pub use core::TallyConfig;

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tally: TallySettings,
    #[serde(default)]
    pub report: ReportSettings,
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallySettings {
    /// How directories are keyed in the global map
    #[serde(default)]
    pub key_by: KeyMode,
}

/// Reporter settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Also print directories without any regular file
    #[serde(default)]
    pub show_empty: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned columns, one directory per line
    #[default]
    Text,
    /// The full report as JSON
    Json,
}
