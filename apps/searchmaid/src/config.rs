use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub listing_url: String,
    pub viewport_width: f64,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listing_url: "http://127.0.0.1:8000/maid/api/maids/".into(),
            viewport_width: 1280.0,
            request_timeout_secs: None,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    listing_url: Option<String>,
    viewport_width: Option<f64>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the TOML file at `path` if it exists, then environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file_settings(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file_settings(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.listing_url {
        settings.listing_url = v;
    }
    if let Some(v) = file_cfg.viewport_width {
        settings.viewport_width = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

/// `SEARCHMAID_*` first, then `APP__*` on top, then `RUST_LOG` for the log filter.
fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for prefix in ["SEARCHMAID_", "APP__"] {
        let var = |key: &str| lookup(&format!("{prefix}{key}"));

        if let Some(v) = var("LISTING_URL") {
            settings.listing_url = v;
        }
        if let Some(parsed) = var("VIEWPORT_WIDTH").and_then(|v| v.parse::<f64>().ok()) {
            settings.viewport_width = parsed;
        }
        if let Some(parsed) = var("REQUEST_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            settings.request_timeout_secs = Some(parsed);
        }
        if let Some(v) = var("LOG_FILTER") {
            settings.log_filter = v;
        }
    }

    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
