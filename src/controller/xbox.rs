//! # Xbox 360 Controller Module
//!
//! This module handles Xbox 360 gamepad detection, connection, and input reading
//! using the Linux evdev interface.
//!
//! ## Controller Detection
//!
//! The controller is identified by:
//! - Vendor ID: 0x045e (Microsoft)
//! - Product ID: 0x028e (Xbox 360 wired controller)
//!
//! A device path can also be given explicitly, which skips the ID check.

use evdev::Device;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{JointControllerError, Result};

/// Microsoft vendor ID
const XBOX_VENDOR_ID: u16 = 0x045e;

/// Xbox 360 wired controller product ID
const XBOX_360_PRODUCT_ID: u16 = 0x028e;

/// Xbox 360 controller handle
///
/// Represents an open evdev gamepad. Provides methods for reading input events.
pub struct XboxController {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for XboxController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XboxController")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl XboxController {
    /// Detect and open the first available Xbox 360 controller
    ///
    /// Scans all `/dev/input/event*` devices and matches vendor and product IDs.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No matching controller found on the system
    /// - `Controller`: `/dev/input` is missing or unreadable
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use joint_controller::controller::xbox::XboxController;
    ///
    /// let controller = XboxController::open()?;
    /// println!("Connected to controller at: {}", controller.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(JointControllerError::Controller(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| {
                JointControllerError::Controller(format!("Failed to read /dev/input: {}", e))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                JointControllerError::Controller(format!("Failed to read directory entry: {}", e))
            })?;

        // Deterministic pick when several controllers are attached
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("event"));
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    let id = device.input_id();
                    debug!(
                        "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                        path.display(),
                        id.vendor(),
                        id.product()
                    );

                    if is_xbox_360(id.vendor(), id.product()) {
                        let device_path = path.to_string_lossy().to_string();
                        info!("Found Xbox 360 controller at: {}", device_path);

                        return Ok(XboxController {
                            device,
                            device_path,
                        });
                    }
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(JointControllerError::ControllerNotFound)
    }

    /// Open a specific evdev device without checking its IDs
    ///
    /// # Errors
    ///
    /// Returns `Controller` if the device cannot be opened.
    pub fn open_path(path: &str) -> Result<Self> {
        let device = Device::open(path).map_err(|e| {
            JointControllerError::Controller(format!("Failed to open {}: {}", path, e))
        })?;

        info!(
            "Opened gamepad {} at {}",
            device.name().unwrap_or("<unnamed>"),
            path
        );

        Ok(XboxController {
            device,
            device_path: path.to_string(),
        })
    }

    /// Open `path` if non-empty, otherwise auto-detect.
    pub fn open_configured(path: &str) -> Result<Self> {
        if path.is_empty() {
            Self::open()
        } else {
            Self::open_path(path)
        }
    }

    /// The `/dev/input/eventX` path that was used to open this controller.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Fetch events from the controller
    ///
    /// Blocks until at least one event is available.
    ///
    /// # Errors
    ///
    /// Returns `Controller` error if fetching events fails (e.g., controller disconnected).
    pub fn fetch_events(&mut self) -> Result<impl Iterator<Item = evdev::InputEvent> + '_> {
        self.device
            .fetch_events()
            .map_err(|e| JointControllerError::Controller(format!("Failed to fetch events: {}", e)))
    }

    /// Human-readable device name reported by the kernel.
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }
}

fn is_xbox_360(vendor: u16, product: u16) -> bool {
    vendor == XBOX_VENDOR_ID && product == XBOX_360_PRODUCT_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xbox_ids() {
        assert_eq!(XBOX_VENDOR_ID, 0x045e, "Microsoft vendor ID should be 0x045e");
        assert_eq!(XBOX_360_PRODUCT_ID, 0x028e, "Xbox 360 product ID should be 0x028e");
    }

    #[test]
    fn test_is_xbox_360() {
        assert!(is_xbox_360(0x045e, 0x028e));
        assert!(!is_xbox_360(0x054c, 0x0ce6));
        assert!(!is_xbox_360(0x045e, 0x0b12));
    }

    #[test]
    fn test_open_path_invalid_device() {
        let result = XboxController::open_path("/dev/input/nonexistent_event_12345");
        match result {
            Err(JointControllerError::Controller(msg)) => {
                assert!(msg.contains("/dev/input/nonexistent_event_12345"));
                assert!(msg.contains("Failed to open"));
            }
            other => panic!("Expected Controller error, got: {:?}", other),
        }
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_open_with_real_hardware() {
        let controller =
            XboxController::open().expect("Should detect connected Xbox 360 controller");
        assert!(controller.device_path().starts_with("/dev/input/event"));
        assert!(controller.name().is_some());
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_fetch_events_with_real_hardware() {
        let mut controller = XboxController::open().expect("Controller not found");

        println!("Press the d-pad within 5 seconds...");

        for _ in 0..100 {
            if let Ok(mut events) = controller.fetch_events() {
                if let Some(event) = events.next() {
                    println!("Received event: {:?}", event);
                    return;
                }
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        panic!("No events received from controller");
    }
}
