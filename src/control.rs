//! # Control Dispatch
//!
//! Runs one gamepad snapshot through the selected control mode and decides
//! whether a packet goes out to the MCU.
//!
//! ## Open loop
//!
//! 1. Proximal joint mapping
//! 2. Distal joint mapping
//! 3. Constant duty on all four motor channels
//! 4. Duplicate filter; emit only on change
//!
//! ## Closed loop
//!
//! Position hold from encoder and current-sense feedback. The MCU does not
//! report feedback yet, so the mode can be selected and configured but every
//! event is rejected with `UnsupportedMode`. The intended behavior: sample
//! the joint angle, drive the motors back toward the target angle when
//! perturbed, ignore current-sense samples that jump outside the hysteresis
//! band of the previous sample, and never exceed `max_current`.

use tracing::{debug, warn};

use crate::controller::joy::JoyEvent;
use crate::controller::translator::translate;
use crate::error::{JointControllerError, Result};
use crate::packet::filter::{ChangeFilter, FilterDecision};
use crate::packet::protocol::MotorPacket;

/// Parameters for closed-loop position hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedLoopParams {
    /// Joint angle to hold, in encoder counts.
    pub target_angle: f32,
    /// Current-sense reading above which motors must not be driven.
    pub max_current: f32,
    /// Largest accepted jump between consecutive current-sense samples.
    pub hysteresis_band: f32,
}

/// Control mode selected at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ControlMode {
    /// D-pad drives the joints directly at a fixed duty.
    #[default]
    OpenLoop,
    /// Feedback position hold. Not implemented.
    ClosedLoop(ClosedLoopParams),
}

impl ControlMode {
    /// Mode name as written in the config file.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ControlMode::OpenLoop => "open_loop",
            ControlMode::ClosedLoop(_) => "closed_loop",
        }
    }
}

/// Packet counts since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub emitted: u64,
    pub suppressed: u64,
    /// Events refused because the selected mode cannot handle them
    pub rejected: u64,
}

/// Per-event handler for one joint segment.
///
/// Owns the packet under construction and the last emitted packet.
///
/// # Thread Safety
///
/// `JointController` holds no locks. It assumes events are delivered one at
/// a time and each call to [`JointController::handle`] finishes before the
/// next begins. Keep it owned by a single task.
///
/// # Examples
///
/// ```
/// use joint_controller::control::{ControlMode, JointController};
/// use joint_controller::controller::joy::{axes, JoyEvent};
///
/// let mut controller = JointController::new(ControlMode::OpenLoop);
/// let mut event = JoyEvent::neutral();
/// event.axes[axes::D_PAD_UP_DOWN] = 1.0;
///
/// assert!(controller.handle(&event)?.is_some());
/// // Same input again is a duplicate
/// assert!(controller.handle(&event)?.is_none());
/// # Ok::<(), joint_controller::error::JointControllerError>(())
/// ```
#[derive(Debug)]
pub struct JointController {
    mode: ControlMode,
    current: MotorPacket,
    filter: ChangeFilter,
    stats: DispatchStats,
}

impl JointController {
    #[must_use]
    pub fn new(mode: ControlMode) -> Self {
        Self {
            mode,
            current: MotorPacket::zeroed(),
            filter: ChangeFilter::new(),
            stats: DispatchStats::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Handle one snapshot.
    ///
    /// Returns `Some(packet)` when the packet differs from the last one
    /// emitted, `None` when it is a duplicate.
    ///
    /// # Errors
    ///
    /// - `MissingAxis`: the snapshot is too short; state is left unchanged
    /// - `UnsupportedMode`: closed-loop mode is selected
    pub fn handle(&mut self, event: &JoyEvent) -> Result<Option<MotorPacket>> {
        match self.mode {
            ControlMode::OpenLoop => self.open_loop(event),
            ControlMode::ClosedLoop(_) => {
                self.stats.rejected += 1;
                Err(JointControllerError::UnsupportedMode(self.mode.name().to_string()))
            }
        }
    }

    fn open_loop(&mut self, event: &JoyEvent) -> Result<Option<MotorPacket>> {
        self.current = translate(event, self.current)?;

        match self.filter.check(&self.current) {
            FilterDecision::Emit => {
                self.stats.emitted += 1;
                debug!("Emitting motor packet {}", self.current);
                Ok(Some(self.current))
            }
            FilterDecision::Duplicate => {
                self.stats.suppressed += 1;
                Ok(None)
            }
        }
    }

    /// Return to the startup state (all-zero packet, nothing emitted yet).
    ///
    /// Called when the node stops driving the joints; the next snapshot is
    /// compared against zero rather than stale input.
    pub fn reset(&mut self) {
        if self.current != MotorPacket::zeroed() {
            warn!("Resetting joint controller with motors still commanded: {}", self.current);
        }
        self.current = MotorPacket::zeroed();
        self.filter.reset();
    }

    /// The last emitted packet.
    #[must_use]
    pub fn last_emitted(&self) -> &MotorPacket {
        self.filter.previous()
    }

    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}
