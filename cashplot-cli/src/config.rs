use anyhow::{Context, Result};
use cashplot_core::{Config, RawConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.json")
}

pub fn parse_config(text: &str, format: ConfigFormat) -> Result<Config> {
    let raw: RawConfig = match format {
        ConfigFormat::Json => serde_json::from_str(text).context("parse JSON config")?,
        ConfigFormat::Toml => toml::from_str(text).context("parse TOML config")?,
    };
    Ok(Config::from_raw(raw)?)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config = parse_config(&text, ConfigFormat::from_path(path))
        .with_context(|| format!("load config {}", path.display()))?;
    log::info!(
        "loaded {} ({} savings accounts, {} rules)",
        path.display(),
        config.savings_accounts().len(),
        config.match_rules().len()
    );
    Ok(config)
}
