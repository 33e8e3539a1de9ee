//! # Duplicate Packet Filter
//!
//! Suppresses a motor packet when it is identical to the last one sent, so a
//! held or idle gamepad does not flood the MCU link with repeated commands.

use super::protocol::{MotorPacket, PACKET_LENGTH};

/// Outcome of comparing a new packet with the last emitted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// At least one slot differs; send the packet.
    Emit,
    /// Every slot matches; stay silent.
    Duplicate,
}

impl FilterDecision {
    /// True if the packet should be sent.
    #[must_use]
    pub fn should_emit(self) -> bool {
        matches!(self, FilterDecision::Emit)
    }
}

/// Compare `new` against `previous` and return the decision together with
/// the updated previous packet.
///
/// Every one of the twelve slots is checked. Each mismatching slot is copied
/// from `new`, so after the scan the returned packet always equals `new`.
///
/// # Examples
///
/// ```
/// use joint_controller::packet::filter::{filter_duplicate, FilterDecision};
/// use joint_controller::packet::protocol::MotorPacket;
///
/// let previous = MotorPacket::zeroed();
/// let (decision, previous) = filter_duplicate(&MotorPacket::zeroed(), previous);
/// assert_eq!(decision, FilterDecision::Duplicate);
/// assert_eq!(previous, MotorPacket::zeroed());
/// ```
#[must_use]
pub fn filter_duplicate(
    new: &MotorPacket,
    mut previous: MotorPacket,
) -> (FilterDecision, MotorPacket) {
    let mut changed = false;

    let prev = previous.values_mut();
    for slot in 0..PACKET_LENGTH {
        let value = new.get(slot);
        if prev[slot] != value {
            prev[slot] = value;
            changed = true;
        }
    }

    let decision = if changed {
        FilterDecision::Emit
    } else {
        FilterDecision::Duplicate
    };

    (decision, previous)
}

/// Stateful wrapper around [`filter_duplicate`] that owns the last emitted packet.
///
/// Starts from [`MotorPacket::zeroed`], so an all-zero first packet is
/// treated as a duplicate.
#[derive(Debug, Clone, Default)]
pub struct ChangeFilter {
    previous: MotorPacket,
}

impl ChangeFilter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            previous: MotorPacket::zeroed(),
        }
    }

    /// Check `packet` and record it as the last emitted one if it differs.
    pub fn check(&mut self, packet: &MotorPacket) -> FilterDecision {
        let (decision, previous) = filter_duplicate(packet, self.previous);
        self.previous = previous;
        decision
    }

    /// The last emitted packet.
    #[must_use]
    pub fn previous(&self) -> &MotorPacket {
        &self.previous
    }

    /// Forget the last emitted packet and return to the all-zero startup state.
    pub fn reset(&mut self) {
        self.previous = MotorPacket::zeroed();
    }
}
