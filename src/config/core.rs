use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::Serialize;

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub struct TallyConfig {
    figment: Figment,
}

impl TallyConfig {
    pub fn load() -> Result<Self> {
        Self::load_with(None, None::<&()>)
    }

    /// Build the layered configuration
    ///
    /// Priority, lowest first: embedded defaults, user config, `dirtally.toml`
    /// in the working directory, `custom_config`, `DIRTALLY_*` environment
    /// variables, then `cli_overrides`. Missing files are skipped.
    pub fn load_with<T: Serialize>(custom_config: Option<&str>, cli_overrides: Option<T>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .merge(Toml::file(Self::user_config_path()))
            .merge(Toml::file("dirtally.toml"));

        if let Some(custom_path) = custom_config {
            figment = figment.merge(Toml::file(custom_path));
        }

        // Environment variables override files, e.g. DIRTALLY_TALLY__KEY_BY=path
        figment = figment.merge(Env::prefixed("DIRTALLY_").split("__"));

        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(TallyConfig { figment })
    }

    /// Extract the typed settings
    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .context("Invalid dirtally configuration")
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/dirtally/config.toml", home),
            Err(_) => "~/.config/dirtally/config.toml".to_string(),
        }
    }
}
