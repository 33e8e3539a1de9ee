//! # Motor Packet Module
//!
//! The command packet sent to the joint segment MCU.
//!
//! This module handles:
//! - Packet layout (8 direction flags + 4 duty values)
//! - Flat little-endian wire encoding and decoding
//! - Duplicate packet suppression

pub mod protocol;
pub mod encoder;
pub mod decoder;
pub mod filter;
