//! # Joint Controller Library
//!
//! Drive an antagonist robotic joint segment from a gamepad.
//!
//! This library provides the core functionality for translating gamepad
//! snapshots into the 12-value motor packet the segment MCU expects, and
//! for suppressing packets that repeat the last one sent.

pub mod config;
pub mod error;
pub mod packet;
pub mod controller;
pub mod control;
pub mod serial;
