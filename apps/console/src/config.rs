use std::{fs, path::Path};

use client_core::DEFAULT_ENDPOINT;
use serde::Deserialize;
use shared::domain::ModeId;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "gesture.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub resync_mode_on_connect: bool,
    pub initial_mode: ModeId,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            resync_mode_on_connect: false,
            initial_mode: ModeId::Normal,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    resync_mode_on_connect: Option<bool>,
    initial_mode: Option<String>,
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();
    apply_file(&mut settings, path);
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, path: &Path) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    let file_cfg = match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring malformed settings file");
            return;
        }
    };

    if let Some(v) = file_cfg.endpoint {
        settings.endpoint = v;
    }
    if let Some(v) = file_cfg.resync_mode_on_connect {
        settings.resync_mode_on_connect = v;
    }
    if let Some(mode) = file_cfg.initial_mode.and_then(|v| v.parse().ok()) {
        settings.initial_mode = mode;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("GESTURE_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = lookup("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = lookup("APP__RESYNC_MODE_ON_CONNECT").and_then(|v| parse_flag(&v)) {
        settings.resync_mode_on_connect = v;
    }

    if let Some(mode) = lookup("APP__INITIAL_MODE").and_then(|v| v.parse().ok()) {
        settings.initial_mode = mode;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
