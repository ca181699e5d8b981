//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Values resolve in layers: built-in defaults, then the optional
//! `cctv-ptz.toml` file, then command-line overrides applied by the
//! binary.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::pelco::frame::PELCO_MAX_SPEED;
use crate::serial::sink_enabled;

/// Config file looked up in the working directory when no explicit path is
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "cctv-ptz.toml";

/// Baud rates accepted by Pelco-D RS-485 equipment.
const VALID_BAUD_RATES: [u32; 7] = [2400, 4800, 9600, 19200, 38400, 57600, 115200];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Pelco-D device address, 0-255.
    #[serde(default)]
    pub address: u8,

    /// Serial port baud rate.
    #[serde(default = "default_baud")]
    pub baud: u32,

    /// Index of the gamepad to use among detected devices.
    #[serde(default)]
    pub joystick: usize,

    /// Speed ceiling as a percentage, 0-100.
    #[serde(default = "default_max_speed")]
    pub max_speed: u8,

    /// Serial port for RS-485 output; `/dev/null` disables the sink.
    #[serde(default = "default_serial")]
    pub serial: String,

    /// Record file for Pelco-D command lines; `-` routes to stdout.
    #[serde(default = "default_record")]
    pub record: String,

    /// Print Pelco-D commands to stdout instead of the status line.
    #[serde(default)]
    pub verbose: bool,
}

// Default value functions
fn default_baud() -> u32 { 9600 }
fn default_max_speed() -> u8 { 100 }
fn default_serial() -> String { "/dev/ttyUSB0".to_string() }
fn default_record() -> String { "/dev/null".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            address: 0,
            baud: default_baud(),
            joystick: 0,
            max_speed: default_max_speed(),
            serial: default_serial(),
            record: default_record(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, from `cctv-ptz.toml` in
    /// the working directory when present, or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::load(default_path);
        }

        Ok(Self::default())
    }

    /// The effective speed ceiling: the configured percentage applied to
    /// the protocol maximum of 63.
    #[must_use]
    pub fn effective_max_speed(&self) -> u8 {
        (u32::from(self.max_speed) * u32::from(PELCO_MAX_SPEED) / 100) as u8
    }

    /// Whether the serial sink is enabled for this configuration.
    #[must_use]
    pub fn serial_enabled(&self) -> bool {
        sink_enabled(&self.serial)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.max_speed > 100 {
            return Err(crate::error::CctvPtzError::Config(
                toml::de::Error::custom("max_speed must be between 0 and 100"),
            ));
        }

        if !VALID_BAUD_RATES.contains(&self.baud) {
            return Err(crate::error::CctvPtzError::Config(
                toml::de::Error::custom(
                    "baud must be one of: 2400, 4800, 9600, 19200, 38400, 57600, 115200",
                ),
            ));
        }

        if self.serial.is_empty() {
            return Err(crate::error::CctvPtzError::Config(
                toml::de::Error::custom("serial port cannot be empty"),
            ));
        }

        if self.record.is_empty() {
            return Err(crate::error::CctvPtzError::Config(
                toml::de::Error::custom("record path cannot be empty"),
            ));
        }

        Ok(())
    }
}
