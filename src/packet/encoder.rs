//! # Motor Packet Encoder
//!
//! Serializes a motor packet for the MCU serial link.
//!
//! The wire format is the flat value array and nothing else: twelve `u16`
//! values, little-endian, 24 bytes. No sync byte, length or checksum.

use bytes::{BufMut, Bytes, BytesMut};

use super::protocol::{MotorPacket, PACKET_LENGTH};

/// Encoded size of one packet in bytes
pub const ENCODED_PACKET_SIZE: usize = PACKET_LENGTH * 2;

/// Encode a motor packet into its 24-byte wire form
///
/// # Examples
///
/// ```
/// use joint_controller::packet::encoder::{encode_packet, ENCODED_PACKET_SIZE};
/// use joint_controller::packet::protocol::MotorPacket;
///
/// let bytes = encode_packet(&MotorPacket::zeroed());
/// assert_eq!(bytes.len(), ENCODED_PACKET_SIZE);
/// ```
pub fn encode_packet(packet: &MotorPacket) -> Bytes {
    let mut buf = BytesMut::with_capacity(ENCODED_PACKET_SIZE);
    for &value in packet.as_array() {
        buf.put_u16_le(value);
    }
    buf.freeze()
}
