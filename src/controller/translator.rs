//! # Joint Command Translator
//!
//! Maps a gamepad snapshot to motor packet flags for the two joints of the
//! segment.
//!
//! ## Assignments
//!
//! | Joint | Input | Slots |
//! |-------|-------|-------|
//! | Proximal | D-Pad up/down | 4-7 |
//! | Distal | D-Pad left/right | 0-3 |
//! | Co-contract | Left trigger | overrides the moving joint's own pair |
//! | Co-release | Right trigger | overrides a pair of the other side |
//!
//! A joint moves only when its d-pad axis is exactly +1.0 or -1.0. Any other
//! reading brakes it (all four flags cleared). D-pad axes only ever report
//! -1.0, 0.0 or +1.0, so the comparison is exact.
//!
//! ## Ordering
//!
//! [`translate`] runs the proximal mapping first and the distal mapping
//! second. The distal mapping always writes slots 0-3, so a proximal
//! co-release written to slots 0-1 does not survive the same event.
//!
//! ## Usage
//!
//! ```
//! use joint_controller::controller::joy::{axes, JoyEvent};
//! use joint_controller::controller::translator::translate;
//! use joint_controller::packet::protocol::MotorPacket;
//!
//! let mut event = JoyEvent::neutral();
//! event.axes[axes::D_PAD_UP_DOWN] = 1.0;
//!
//! let packet = translate(&event, MotorPacket::zeroed())?;
//! assert_eq!(packet.as_array(), &[0, 0, 0, 0, 1, 0, 1, 0, 204, 204, 204, 204]);
//! # Ok::<(), joint_controller::error::JointControllerError>(())
//! ```

use super::joy::{axes, JoyEvent};
use crate::error::Result;
use crate::packet::protocol::{slots, MotorPacket, DUTY_OPEN_LOOP, FLAG_OFF, FLAG_ON};

/// D-Pad reading for up (proximal) or left (distal).
pub const DPAD_POSITIVE: f32 = 1.0;

/// D-Pad reading for down (proximal) or right (distal).
pub const DPAD_NEGATIVE: f32 = -1.0;

/// Which way a joint is commanded to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointDirection {
    /// D-Pad up (proximal) or left (distal).
    Positive,
    /// D-Pad down (proximal) or right (distal).
    Negative,
    /// Anything else. All of the joint's flags are cleared.
    Brake,
}

impl JointDirection {
    /// Classify a d-pad axis reading. Only exact ±1.0 counts as a press.
    #[must_use]
    pub fn from_axis(value: f32) -> Self {
        if value == DPAD_POSITIVE {
            JointDirection::Positive
        } else if value == DPAD_NEGATIVE {
            JointDirection::Negative
        } else {
            JointDirection::Brake
        }
    }
}

/// Trigger state read once per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Triggers {
    left: bool,
    right: bool,
}

impl Triggers {
    fn read(event: &JoyEvent) -> Result<Self> {
        Ok(Self {
            left: event.trigger_pressed(axes::LEFT_TRIGGER)?,
            right: event.trigger_pressed(axes::RIGHT_TRIGGER)?,
        })
    }
}

/// Terminal pairs one joint drives, plus the pairs its trigger overrides touch.
struct JointSlots {
    a: [usize; 2],
    b: [usize; 2],
    /// Pair overridden on right trigger when moving in the positive direction.
    release_positive: [usize; 2],
}

const PROXIMAL: JointSlots = JointSlots {
    a: slots::PROXIMAL_A,
    b: slots::PROXIMAL_B,
    release_positive: slots::DISTAL_A,
};

const DISTAL: JointSlots = JointSlots {
    a: slots::DISTAL_A,
    b: slots::DISTAL_B,
    release_positive: slots::DISTAL_B,
};

/// Shared mapping for both joints.
///
/// Positive drives (1,0,1,0) across the two pairs and negative (0,1,0,1).
/// The left trigger flips one pair against the other (co-contraction). The
/// right trigger, checked only when the left is released, flips a pair back
/// (co-release).
fn joint_cmds(
    joint: &JointSlots,
    direction: JointDirection,
    triggers: Triggers,
    packet: &mut MotorPacket,
) {
    match direction {
        JointDirection::Positive => {
            packet.set_pair(joint.a, FLAG_ON, FLAG_OFF);
            packet.set_pair(joint.b, FLAG_ON, FLAG_OFF);

            if triggers.left {
                packet.set_pair(joint.a, FLAG_OFF, FLAG_ON);
            } else if triggers.right {
                packet.set_pair(joint.release_positive, FLAG_OFF, FLAG_ON);
            }
        }
        JointDirection::Negative => {
            packet.set_pair(joint.a, FLAG_OFF, FLAG_ON);
            packet.set_pair(joint.b, FLAG_OFF, FLAG_ON);

            if triggers.left {
                packet.set_pair(joint.b, FLAG_ON, FLAG_OFF);
            } else if triggers.right {
                packet.set_pair(joint.a, FLAG_ON, FLAG_OFF);
            }
        }
        JointDirection::Brake => {
            packet.set_pair(joint.a, FLAG_OFF, FLAG_OFF);
            packet.set_pair(joint.b, FLAG_OFF, FLAG_OFF);
        }
    }
}

/// Proximal joint mapping (d-pad up/down, slots 4-7).
///
/// On up with the right trigger pressed (and the left released), slots 0-1
/// of the distal joint are set to (0,1).
///
/// # Errors
///
/// Returns `MissingAxis` if the event lacks the d-pad or trigger axes.
pub fn proximal_joint_cmds(event: &JoyEvent, mut packet: MotorPacket) -> Result<MotorPacket> {
    let direction = JointDirection::from_axis(event.axis(axes::D_PAD_UP_DOWN)?);
    let triggers = Triggers::read(event)?;
    joint_cmds(&PROXIMAL, direction, triggers, &mut packet);
    Ok(packet)
}

/// Distal joint mapping (d-pad left/right, slots 0-3).
///
/// # Errors
///
/// Returns `MissingAxis` if the event lacks the d-pad or trigger axes.
pub fn distal_joint_cmds(event: &JoyEvent, mut packet: MotorPacket) -> Result<MotorPacket> {
    let direction = JointDirection::from_axis(event.axis(axes::D_PAD_LEFT_RIGHT)?);
    let triggers = Triggers::read(event)?;
    joint_cmds(&DISTAL, direction, triggers, &mut packet);
    Ok(packet)
}

/// Full open-loop translation: proximal, then distal, then duty.
///
/// `current` is the packet built by the previous event. All eight flag slots
/// and all four duty slots are rewritten.
///
/// # Errors
///
/// Returns `MissingAxis` if the event lacks any axis the mapping reads.
/// Nothing is written in that case.
pub fn translate(event: &JoyEvent, current: MotorPacket) -> Result<MotorPacket> {
    let packet = proximal_joint_cmds(event, current)?;
    let mut packet = distal_joint_cmds(event, packet)?;
    packet.set_duty(DUTY_OPEN_LOOP);
    Ok(packet)
}
