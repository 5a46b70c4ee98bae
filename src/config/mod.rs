// SPDX-License-Identifier: MPL-2.0
//! This module handles the controller's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use playback_controller::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.controls_hide_delay_secs = Some(5);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_file = PathBuf::from("./temp_config_dir/test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.controls_hide_delay_secs, Some(5));
//! ```

mod defaults;

pub use defaults::*;

use crate::domain::playback::{ControlsHideDelay, SeekStep, Volume};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "PlaybackController";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub controls_hide_delay_secs: Option<u32>,
    #[serde(default)]
    pub default_volume: Option<f32>,
    #[serde(default)]
    pub keyboard_seek_step_secs: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controls_hide_delay_secs: Some(DEFAULT_CONTROLS_HIDE_DELAY_SECS),
            default_volume: Some(DEFAULT_VOLUME),
            keyboard_seek_step_secs: Some(DEFAULT_KEYBOARD_SEEK_STEP_SECS),
        }
    }
}

/// Validated per-session settings resolved from a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionSettings {
    pub hide_delay: ControlsHideDelay,
    pub initial_volume: Volume,
    pub seek_step: SeekStep,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            hide_delay: config
                .controls_hide_delay_secs
                .map(ControlsHideDelay::new)
                .unwrap_or_default(),
            initial_volume: config
                .default_volume
                .filter(|v| v.is_finite())
                .map(Volume::new)
                .unwrap_or_default(),
            seek_step: config
                .keyboard_seek_step_secs
                .filter(|s| s.is_finite())
                .map(SeekStep::new)
                .unwrap_or_default(),
        }
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
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::warn!(
                "Ignoring invalid settings at {}: {}",
                path.display(),
                err
            );
            Ok(Config::default())
        }
    }
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
    use crate::test_utils::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            controls_hide_delay_secs: Some(7),
            default_volume: Some(0.25),
            keyboard_seek_step_secs: Some(5.0),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn load_from_path_fills_missing_fields_with_none() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "controls_hide_delay_secs = 4\n").expect("write");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded.controls_hide_delay_secs, Some(4));
        assert!(loaded.default_volume.is_none());
    }

    #[test]
    fn load_from_missing_path_is_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }

    #[test]
    fn session_settings_clamp_out_of_range_values() {
        let config = Config {
            controls_hide_delay_secs: Some(500),
            default_volume: Some(3.0),
            keyboard_seek_step_secs: None,
        };
        let settings = SessionSettings::from(&config);

        assert_eq!(settings.hide_delay.value(), MAX_CONTROLS_HIDE_DELAY_SECS);
        assert_abs_diff_eq!(settings.initial_volume.value(), MAX_VOLUME);
        assert_abs_diff_eq!(settings.seek_step.value(), DEFAULT_KEYBOARD_SEEK_STEP_SECS);
    }

    #[test]
    fn session_settings_ignore_non_finite_values() {
        let config = Config {
            controls_hide_delay_secs: None,
            default_volume: Some(f32::NAN),
            keyboard_seek_step_secs: Some(f64::INFINITY),
        };
        let settings = SessionSettings::from(&config);

        assert_abs_diff_eq!(settings.initial_volume.value(), DEFAULT_VOLUME);
        assert_abs_diff_eq!(settings.seek_step.value(), DEFAULT_KEYBOARD_SEEK_STEP_SECS);
    }
}
