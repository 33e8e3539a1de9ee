//! # Serial Communication Module
//!
//! Handles the serial link to the joint segment MCU.
//!
//! This module handles:
//! - Opening the MCU serial port (8N1, no flow control)
//! - Writing encoded motor packets, one write + flush per packet

pub mod port_trait;

use crate::error::{JointControllerError, Result};
use crate::packet::encoder::encode_packet;
use crate::packet::protocol::MotorPacket;
use port_trait::{SerialPortIO, TokioSerialPort};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

/// Default MCU link baud rate
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Default MCU device paths to try (in order of preference)
pub const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // Native USB boards
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// MCU Serial Link
///
/// Owns the port the motor packets are written to.
pub struct McuSerial {
    port: Box<dyn SerialPortIO>,
    device_path: String,
}

impl std::fmt::Debug for McuSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McuSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl McuSerial {
    /// Open the configured port, falling back to the default paths when
    /// `path` is empty.
    ///
    /// # Errors
    ///
    /// Returns error if no candidate device could be opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use joint_controller::serial::{McuSerial, DEFAULT_BAUD_RATE};
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let serial = McuSerial::open("/dev/ttyACM0", DEFAULT_BAUD_RATE)?;
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        if path.is_empty() {
            Self::open_with_paths(DEFAULT_DEVICE_PATHS, baud_rate)
        } else {
            Self::open_with_paths(&[path], baud_rate)
        }
    }

    /// Open the first of `paths` that succeeds
    ///
    /// # Errors
    ///
    /// Returns `SerialPortNotFound` listing every path tried.
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Successfully opened MCU device at {} ({} baud)", path, baud_rate);
                    return Ok(Self::from_port(Box::new(TokioSerialPort::new(port)), path));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(JointControllerError::SerialPortNotFound(paths.join(", ")))
    }

    /// Wrap an already-open port.
    pub fn from_port(port: Box<dyn SerialPortIO>, device_path: &str) -> Self {
        Self {
            port,
            device_path: device_path.to_string(),
        }
    }

    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| JointControllerError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Encode and send one motor packet
    ///
    /// # Errors
    ///
    /// Returns `Serial` if the write or the flush fails.
    pub async fn send_packet(&mut self, packet: &MotorPacket) -> Result<()> {
        let bytes = encode_packet(packet);

        self.port
            .write_all(&bytes)
            .await
            .map_err(|e| JointControllerError::Serial(format!("Failed to write packet: {}", e)))?;

        self.port
            .flush()
            .await
            .map_err(|e| {
                JointControllerError::Serial(format!("Failed to flush serial port: {}", e))
            })?;

        debug!("Sent motor packet ({} bytes)", bytes.len());
        Ok(())
    }

    /// Path of the opened serial device
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}
