//! # Motor Packet Layout
//!
//! Fixed layout of the command packet sent to the segment MCU.
//!
//! ```text
//! Slot:  0  1  2  3 | 4  5  6  7 | 8   9   10  11
//!        distal     | proximal   | duty (motor channels)
//!        A+ A- B+ B-| A+ A- B+ B-|
//! ```
//!
//! Flag slots hold 0 or 1 and are driven straight onto the H-bridge
//! direction pins. Duty slots hold a PWM byte (0-255).

use std::fmt;

/// Number of values in a motor packet
pub const PACKET_LENGTH: usize = 12;

/// Number of direction/enable flag slots (two per terminal, four terminals)
pub const NUM_FLAG_SLOTS: usize = 8;

/// Number of motor duty slots
pub const NUM_DUTY_SLOTS: usize = 4;

/// Flag value: terminal driven
pub const FLAG_ON: u16 = 1;

/// Flag value: terminal released
pub const FLAG_OFF: u16 = 0;

/// Maximum PWM duty value (100%)
pub const DUTY_MAX: u16 = 255;

/// Duty used for every motor channel in open-loop mode (80% of 255)
pub const DUTY_OPEN_LOOP: u16 = 204;

/// Slot indices for semantic access.
pub mod slots {
    /// Distal joint, first terminal pair.
    pub const DISTAL_A: [usize; 2] = [0, 1];
    /// Distal joint, second terminal pair.
    pub const DISTAL_B: [usize; 2] = [2, 3];
    /// Proximal joint, first terminal pair.
    pub const PROXIMAL_A: [usize; 2] = [4, 5];
    /// Proximal joint, second terminal pair.
    pub const PROXIMAL_B: [usize; 2] = [6, 7];
    /// All four motor duty slots.
    pub const DUTY: std::ops::Range<usize> = 8..12;
}

/// One motor command packet.
///
/// Always exactly [`PACKET_LENGTH`] values long.
///
/// # Examples
///
/// ```
/// use joint_controller::packet::protocol::{MotorPacket, PACKET_LENGTH};
///
/// let packet = MotorPacket::zeroed();
/// assert_eq!(packet.as_array(), &[0u16; PACKET_LENGTH]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MotorPacket([u16; PACKET_LENGTH]);

impl MotorPacket {
    /// All flags released and all duties zero. This is the startup state.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self([0; PACKET_LENGTH])
    }

    /// Wraps a raw value array.
    #[must_use]
    pub const fn from_array(values: [u16; PACKET_LENGTH]) -> Self {
        Self(values)
    }

    /// Borrow the raw value array.
    #[must_use]
    pub const fn as_array(&self) -> &[u16; PACKET_LENGTH] {
        &self.0
    }

    /// Value at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= PACKET_LENGTH`. Slot indices come from [`slots`].
    #[must_use]
    pub fn get(&self, slot: usize) -> u16 {
        self.0[slot]
    }

    /// Sets a terminal pair to `(first, second)`.
    pub fn set_pair(&mut self, pair: [usize; 2], first: u16, second: u16) {
        self.0[pair[0]] = first;
        self.0[pair[1]] = second;
    }

    /// Reads a terminal pair.
    #[must_use]
    pub fn pair(&self, pair: [usize; 2]) -> (u16, u16) {
        (self.0[pair[0]], self.0[pair[1]])
    }

    /// Sets every duty slot to `duty`, clamped to [`DUTY_MAX`].
    pub fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(DUTY_MAX);
        for slot in slots::DUTY {
            self.0[slot] = duty;
        }
    }

    /// The four duty values.
    #[must_use]
    pub fn duties(&self) -> &[u16] {
        &self.0[slots::DUTY]
    }

    /// The eight direction flags.
    #[must_use]
    pub fn flags(&self) -> &[u16] {
        &self.0[..NUM_FLAG_SLOTS]
    }

    pub(crate) fn values_mut(&mut self) -> &mut [u16; PACKET_LENGTH] {
        &mut self.0
    }
}

impl From<[u16; PACKET_LENGTH]> for MotorPacket {
    fn from(values: [u16; PACKET_LENGTH]) -> Self {
        Self(values)
    }
}

impl fmt::Display for MotorPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(PACKET_LENGTH, 12);
        assert_eq!(NUM_FLAG_SLOTS + NUM_DUTY_SLOTS, PACKET_LENGTH);
        assert_eq!(slots::DUTY.len(), NUM_DUTY_SLOTS);
        assert_eq!(DUTY_OPEN_LOOP, 204);
        // 80% of full scale
        assert_eq!(DUTY_MAX * 4 / 5, DUTY_OPEN_LOOP);
    }

    #[test]
    fn test_zeroed_packet() {
        let packet = MotorPacket::zeroed();
        assert_eq!(packet, MotorPacket::default());
        assert!(packet.flags().iter().all(|&f| f == FLAG_OFF));
        assert!(packet.duties().iter().all(|&d| d == 0));
    }

    #[test]
    fn test_set_pair() {
        let mut packet = MotorPacket::zeroed();
        packet.set_pair(slots::PROXIMAL_B, FLAG_ON, FLAG_OFF);
        assert_eq!(packet.pair(slots::PROXIMAL_B), (1, 0));
        assert_eq!(packet.get(6), 1);
        assert_eq!(packet.get(7), 0);
    }

    #[test]
    fn test_set_duty_fills_all_channels() {
        let mut packet = MotorPacket::zeroed();
        packet.set_duty(DUTY_OPEN_LOOP);
        assert_eq!(packet.duties(), &[204, 204, 204, 204]);
        assert!(packet.flags().iter().all(|&f| f == 0));
    }

    #[test]
    fn test_set_duty_clamps() {
        let mut packet = MotorPacket::zeroed();
        packet.set_duty(1000);
        assert_eq!(packet.duties(), &[255, 255, 255, 255]);
    }

    #[test]
    fn test_display() {
        let packet = MotorPacket::from([1, 0, 1, 0, 0, 0, 0, 0, 204, 204, 204, 204]);
        assert_eq!(
            packet.to_string(),
            "[1, 0, 1, 0, 0, 0, 0, 0, 204, 204, 204, 204]"
        );
    }
}
