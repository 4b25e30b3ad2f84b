// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uls24_hid::{Gain, PRODUCT_ID, VENDOR_ID};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceIdentification,
    #[serde(default)]
    pub defaults: CaptureDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceIdentification::default(),
            defaults: CaptureDefaults::default(),
        }
    }
}

/// Device identification (vendor ID, product ID)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentification {
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_product_id")]
    pub product_id: u16,
}

impl Default for DeviceIdentification {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
        }
    }
}

fn default_vendor_id() -> u16 {
    VENDOR_ID
}

fn default_product_id() -> u16 {
    PRODUCT_ID
}

/// Capture settings used when the command line leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureDefaults {
    #[serde(default = "default_channel")]
    pub channel: u8,
    #[serde(default = "default_gain")]
    pub gain: Gain,
    #[serde(default = "default_integration_ms")]
    pub integration_ms: u32,
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            gain: default_gain(),
            integration_ms: default_integration_ms(),
        }
    }
}

fn default_channel() -> u8 {
    1
}

fn default_gain() -> Gain {
    Gain::Low
}

fn default_integration_ms() -> u32 {
    30
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML config")?;
        Ok(config)
    }

    /// Load from an explicit path, or from the default location when it
    /// exists, or fall back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Some(default) = Self::default_path() {
            if default.exists() {
                return Self::from_file(&default);
            }
        }
        Ok(Self::default())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("uls24").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_builtin_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.device.vendor_id, VENDOR_ID);
        assert_eq!(config.device.product_id, PRODUCT_ID);
        assert_eq!(config.defaults.channel, 1);
        assert_eq!(config.defaults.gain, Gain::Low);
        assert_eq!(config.defaults.integration_ms, 30);
    }

    #[test]
    fn partial_config_overrides_selected_fields() {
        let yaml = "defaults:\n  channel: 3\n  gain: high\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.defaults.channel, 3);
        assert_eq!(config.defaults.gain, Gain::High);
        assert_eq!(config.defaults.integration_ms, 30);
        assert_eq!(config.device.vendor_id, VENDOR_ID);
    }
}
