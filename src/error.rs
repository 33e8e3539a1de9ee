//! # Error Types
//!
//! Custom error types for the joint controller using `thiserror`.

use thiserror::Error;

/// Main error type for the joint controller
#[derive(Debug, Error)]
pub enum JointControllerError {
    /// Motor packet wire-format errors
    #[error("Motor packet error: {0}")]
    Packet(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial link errors (open, write, flush)
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial devices could be opened
    #[error("No MCU serial device found (tried: {0})")]
    SerialPortNotFound(String),

    /// Gamepad device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No supported gamepad is attached
    #[error("No supported gamepad found")]
    ControllerNotFound,

    /// An input event is shorter than the fixed axis table expects
    #[error("Input event has no axis {index} (only {len} axes)")]
    MissingAxis { index: usize, len: usize },

    /// The selected control mode has no handler
    #[error("Unsupported control mode: {0}")]
    UnsupportedMode(String),
}

/// Result type alias for the joint controller
pub type Result<T> = std::result::Result<T, JointControllerError>;
