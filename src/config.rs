// SPDX-License-Identifier: MPL-2.0
//! Overlay configuration, loaded from and saved to a `settings.toml` file.
//!
//! Everything here is optional: a missing file or a missing key falls back
//! to the built-in defaults, so a fresh install runs without any setup.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "GlowToast";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8520";
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1920;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1080;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
pub const DEFAULT_TOPMOST_SECS: f32 = 3.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local address the ingestion endpoint binds to.
    pub listen: Option<String>,
    /// Screen area the overlay covers, in pixels.
    #[serde(default)]
    pub viewport_width: Option<u32>,
    #[serde(default)]
    pub viewport_height: Option<u32>,
    /// Top-left corner of the toast stack. When unset, the stack anchors
    /// near the top-right corner of the viewport.
    #[serde(default)]
    pub anchor_x: Option<f32>,
    #[serde(default)]
    pub anchor_y: Option<f32>,
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,
    /// How long the overlay stays elevated after a new toast arrives.
    #[serde(default)]
    pub topmost_secs: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: Some(DEFAULT_LISTEN_ADDR.to_string()),
            viewport_width: Some(DEFAULT_VIEWPORT_WIDTH),
            viewport_height: Some(DEFAULT_VIEWPORT_HEIGHT),
            anchor_x: None,
            anchor_y: None,
            tick_interval_ms: Some(DEFAULT_TICK_INTERVAL_MS),
            topmost_secs: Some(DEFAULT_TOPMOST_SECS),
        }
    }
}

impl Config {
    /// Address the ingestion endpoint should listen on.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        self.listen
            .clone()
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_listen_addr() {
        let config = Config {
            listen: Some("127.0.0.1:9000".to_string()),
            anchor_x: Some(10.0),
            anchor_y: Some(20.0),
            ..Config::default()
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.listen, config.listen);
        assert_eq!(loaded.anchor_x, config.anchor_x);
        assert_eq!(loaded.anchor_y, config.anchor_y);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "this is { not toml").expect("failed to write file");

        let loaded = load_from_path(&config_path).expect("load should not fail");
        assert_eq!(loaded.listen_addr(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn missing_keys_fall_back_to_none() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "listen = \"127.0.0.1:1234\"\n").expect("failed to write file");

        let loaded = load_from_path(&config_path).expect("failed to load config");
        assert_eq!(loaded.listen_addr(), "127.0.0.1:1234");
        assert_eq!(loaded.anchor_x, None);
        assert_eq!(loaded.topmost_secs, None);
    }

    #[test]
    fn default_config_has_listen_addr() {
        assert_eq!(Config::default().listen_addr(), DEFAULT_LISTEN_ADDR);
    }
}
