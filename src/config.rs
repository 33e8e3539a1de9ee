//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Configuration is read once at startup.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::control::{ClosedLoopParams, ControlMode};
use crate::error::{JointControllerError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub gamepad: GamepadConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// MCU serial link configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Device path; empty tries the default paths in order
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Gamepad configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GamepadConfig {
    /// evdev device path; empty auto-detects an Xbox 360 controller
    #[serde(default)]
    pub device_path: String,
}

/// Control mode configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_target_angle")]
    pub target_angle: f32,

    #[serde(default = "default_max_current")]
    pub max_current: f32,

    #[serde(default = "default_hysteresis_band")]
    pub hysteresis_band: f32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily log files; empty logs to stdout only
    #[serde(default)]
    pub log_dir: String,
}

// Default value functions
fn default_serial_port() -> String { String::new() }
fn default_baud_rate() -> u32 { 57600 }

fn default_mode() -> String { "open_loop".to_string() }
fn default_target_angle() -> f32 { 512.0 }
fn default_max_current() -> f32 { 350.0 }
fn default_hysteresis_band() -> f32 { 50.0 }

fn default_log_level() -> String { "info".to_string() }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            target_angle: default_target_angle(),
            max_current: default_max_current(),
            hysteresis_band: default_hysteresis_band(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

const VALID_BAUD_RATES: [u32; 5] = [9600, 19200, 38400, 57600, 115200];
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn invalid(msg: impl std::fmt::Display) -> JointControllerError {
    JointControllerError::Config(toml::de::Error::custom(msg))
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
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use joint_controller::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Control mode described by the `[control]` section.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown mode name.
    pub fn control_mode(&self) -> Result<ControlMode> {
        match self.control.mode.as_str() {
            "open_loop" => Ok(ControlMode::OpenLoop),
            "closed_loop" => Ok(ControlMode::ClosedLoop(ClosedLoopParams {
                target_angle: self.control.target_angle,
                max_current: self.control.max_current,
                hysteresis_band: self.control.hysteresis_band,
            })),
            other => Err(invalid(format!(
                "control mode must be 'open_loop' or 'closed_loop', got '{}'",
                other
            ))),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if !VALID_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(invalid("baud_rate must be one of: 9600, 19200, 38400, 57600, 115200"));
        }

        self.control_mode()?;

        if !(self.control.max_current > 0.0) {
            return Err(invalid("max_current must be greater than 0"));
        }

        if !(self.control.hysteresis_band > 0.0) {
            return Err(invalid("hysteresis_band must be greater than 0"));
        }

        if !self.control.target_angle.is_finite() {
            return Err(invalid("target_angle must be a finite number"));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(invalid("log level must be one of: trace, debug, info, warn, error"));
        }

        Ok(())
    }
}
