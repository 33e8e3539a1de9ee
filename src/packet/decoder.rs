//! # Motor Packet Decoder
//!
//! Parses the 24-byte wire form back into a [`MotorPacket`], the way the
//! MCU firmware reads it.

use bytes::Buf;

use super::encoder::ENCODED_PACKET_SIZE;
use super::protocol::{MotorPacket, PACKET_LENGTH};
use crate::error::{JointControllerError, Result};

/// Decode one packet from its wire form
///
/// # Errors
///
/// Returns `Packet` if `frame` is not exactly [`ENCODED_PACKET_SIZE`] bytes.
pub fn decode_packet(frame: &[u8]) -> Result<MotorPacket> {
    if frame.len() != ENCODED_PACKET_SIZE {
        return Err(JointControllerError::Packet(format!(
            "Expected {} bytes, got {}",
            ENCODED_PACKET_SIZE,
            frame.len()
        )));
    }

    let mut buf = frame;
    let mut values = [0u16; PACKET_LENGTH];
    for value in values.iter_mut() {
        *value = buf.get_u16_le();
    }

    Ok(MotorPacket::from_array(values))
}
