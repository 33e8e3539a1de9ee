//! # Controller Module
//!
//! Gamepad input handling.
//!
//! This module handles:
//! - Xbox 360 controller detection and connection via evdev
//! - Converting raw evdev events to positional joy snapshots
//! - Translating snapshots into joint motor flags

pub mod joy;
pub mod xbox;
pub mod mapper;
pub mod translator;
