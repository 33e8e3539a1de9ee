//! # Controller Input Mapper Module
//!
//! This module handles parsing raw evdev events from an Xbox 360 controller
//! and converting them into [`JoyEvent`] snapshots.
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Raw Range | Snapshot Index |
//! |------|------------|-----------|----------------|
//! | Left Stick X | ABS_X | -32768..32767 | 0 |
//! | Left Stick Y | ABS_Y | -32768..32767 | 1 |
//! | LT | ABS_Z | 0..255 | 2 |
//! | Right Stick X | ABS_RX | -32768..32767 | 3 |
//! | Right Stick Y | ABS_RY | -32768..32767 | 4 |
//! | RT | ABS_RZ | 0..255 | 5 |
//! | D-Pad X | ABS_HAT0X | -1/0/1 | 6 |
//! | D-Pad Y | ABS_HAT0Y | -1/0/1 | 7 |
//!
//! Raw values are normalized so that left and up read positive, and triggers
//! read +1.0 released and -1.0 fully pressed. A trigger that has not reported
//! yet stays at 0.0.
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code | Snapshot Index |
//! |--------|------------|----------------|
//! | A | BTN_SOUTH | 0 |
//! | B | BTN_EAST | 1 |
//! | X | BTN_NORTH | 2 |
//! | Y | BTN_WEST | 3 |
//! | LB | BTN_TL | 4 |
//! | RB | BTN_TR | 5 |
//! | Back | BTN_SELECT | 6 |
//! | Start | BTN_START | 7 |
//! | Xbox | BTN_MODE | 8 |
//! | Left stick press | BTN_THUMBL | 9 |
//! | Right stick press | BTN_THUMBR | 10 |
//!
//! ## Usage
//!
//! ```no_run
//! use joint_controller::controller::mapper::EventMapper;
//! use joint_controller::controller::xbox::XboxController;
//!
//! let mut controller = XboxController::open()?;
//! let mut mapper = EventMapper::new();
//!
//! loop {
//!     for event in controller.fetch_events()? {
//!         if let Some(snapshot) = mapper.process_event(&event) {
//!             println!("{:?}", snapshot.axes);
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use evdev::{AbsoluteAxisType, InputEvent, Key, Synchronization};
use tracing::warn;

use super::joy::{axes, buttons, JoyEvent};

/// Full-scale stick deflection.
pub const STICK_MAX: f32 = 32767.0;

/// Full trigger travel.
pub const TRIGGER_MAX: f32 = 255.0;

/// Parses raw evdev events and maintains a [`JoyEvent`] snapshot.
///
/// Events between two `SYN_REPORT`s are accumulated; the report itself
/// releases the snapshot.
///
/// A `SYN_DROPPED` means the kernel discarded events, so the snapshot can no
/// longer be trusted. The mapper returns to neutral and ignores everything up
/// to and including the next `SYN_REPORT`.
///
/// # Thread Safety
///
/// `EventMapper` is not thread-safe. Use from a single task/thread only.
#[derive(Debug)]
pub struct EventMapper {
    state: JoyEvent,
    dropped: bool,
}

impl Default for EventMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl EventMapper {
    /// Creates a new event mapper with every axis at 0.0 and every button released.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: JoyEvent::neutral(),
            dropped: false,
        }
    }

    /// Returns a reference to the current snapshot.
    #[must_use]
    pub fn state(&self) -> &JoyEvent {
        &self.state
    }

    /// Processes a single evdev input event.
    ///
    /// Returns a copy of the snapshot when `event` is a `SYN_REPORT`, `None`
    /// otherwise.
    pub fn process_event(&mut self, event: &InputEvent) -> Option<JoyEvent> {
        match event.kind() {
            evdev::InputEventKind::Synchronization(Synchronization::SYN_DROPPED) => {
                warn!("Gamepad events dropped by the kernel, resynchronizing");
                self.reset();
                self.dropped = true;
                None
            }
            evdev::InputEventKind::Synchronization(Synchronization::SYN_REPORT) => {
                if self.dropped {
                    self.dropped = false;
                    None
                } else {
                    Some(self.state.clone())
                }
            }
            _ if self.dropped => None,
            evdev::InputEventKind::AbsAxis(axis) => {
                self.process_axis_event(axis, event.value());
                None
            }
            evdev::InputEventKind::Key(key) => {
                self.process_key_event(key, event.value() != 0);
                None
            }
            _ => None,
        }
    }

    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        let (index, normalized) = match axis {
            AbsoluteAxisType::ABS_X => (axes::LEFT_JOY_LEFT_RIGHT, normalize_stick(value)),
            AbsoluteAxisType::ABS_Y => (axes::LEFT_JOY_UP_DOWN, normalize_stick(value)),
            AbsoluteAxisType::ABS_Z => (axes::LEFT_TRIGGER, normalize_trigger(value)),
            AbsoluteAxisType::ABS_RX => (axes::RIGHT_JOY_LEFT_RIGHT, normalize_stick(value)),
            AbsoluteAxisType::ABS_RY => (axes::RIGHT_JOY_UP_DOWN, normalize_stick(value)),
            AbsoluteAxisType::ABS_RZ => (axes::RIGHT_TRIGGER, normalize_trigger(value)),
            AbsoluteAxisType::ABS_HAT0X => (axes::D_PAD_LEFT_RIGHT, normalize_hat(value)),
            AbsoluteAxisType::ABS_HAT0Y => (axes::D_PAD_UP_DOWN, normalize_hat(value)),
            _ => return,
        };
        self.state.axes[index] = normalized;
    }

    fn process_key_event(&mut self, key: Key, pressed: bool) {
        let index = match key {
            Key::BTN_SOUTH => buttons::A,
            Key::BTN_EAST => buttons::B,
            Key::BTN_NORTH => buttons::X,
            Key::BTN_WEST => buttons::Y,
            Key::BTN_TL => buttons::LB,
            Key::BTN_TR => buttons::RB,
            Key::BTN_SELECT => buttons::BACK,
            Key::BTN_START => buttons::START,
            Key::BTN_MODE => buttons::XBOX,
            Key::BTN_THUMBL => buttons::PRESS_LEFT_JOY,
            Key::BTN_THUMBR => buttons::PRESS_RIGHT_JOY,
            _ => return,
        };
        self.state.buttons[index] = i32::from(pressed);
    }

    /// Resets the snapshot to neutral: sticks centered, triggers unreported,
    /// d-pad released and buttons up.
    pub fn reset(&mut self) {
        self.state = JoyEvent::neutral();
    }
}

/// Stick: left/up is negative on the wire and positive in the snapshot.
fn normalize_stick(raw: i32) -> f32 {
    (-(raw as f32) / STICK_MAX).clamp(-1.0, 1.0)
}

/// Trigger: 0 (released) maps to +1.0, full pull to -1.0.
fn normalize_trigger(raw: i32) -> f32 {
    (1.0 - 2.0 * raw as f32 / TRIGGER_MAX).clamp(-1.0, 1.0)
}

/// Hat: -1/0/1 mapped exactly, sign flipped so left/up is +1.0.
fn normalize_hat(raw: i32) -> f32 {
    -(raw.signum() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::EventType;

    /// Helper to create an axis event for testing.
    fn make_axis_event(axis: AbsoluteAxisType, value: i32) -> InputEvent {
        InputEvent::new(EventType::ABSOLUTE, axis.0, value)
    }

    /// Helper to create a key event for testing.
    fn make_key_event(key: Key, pressed: bool) -> InputEvent {
        InputEvent::new(EventType::KEY, key.code(), if pressed { 1 } else { 0 })
    }

    fn make_sync_event() -> InputEvent {
        InputEvent::new(EventType::SYNCHRONIZATION, Synchronization::SYN_REPORT.0, 0)
    }

    fn make_dropped_event() -> InputEvent {
        InputEvent::new(EventType::SYNCHRONIZATION, Synchronization::SYN_DROPPED.0, 0)
    }

    #[test]
    fn test_new_mapper_is_neutral() {
        let mapper = EventMapper::new();
        assert_eq!(mapper.state(), &JoyEvent::neutral());
    }

    #[test]
    fn test_snapshot_only_on_sync() {
        let mut mapper = EventMapper::new();
        assert!(mapper
            .process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0Y, -1))
            .is_none());

        let snapshot = mapper.process_event(&make_sync_event()).unwrap();
        assert_eq!(snapshot.axes[axes::D_PAD_UP_DOWN], 1.0);
    }

    #[test]
    fn test_other_sync_events_release_nothing() {
        let mut mapper = EventMapper::new();
        let mt_report =
            InputEvent::new(EventType::SYNCHRONIZATION, Synchronization::SYN_MT_REPORT.0, 0);
        assert!(mapper.process_event(&mt_report).is_none());
    }

    #[test]
    fn test_syn_dropped_discards_stale_press() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0Y, -1));
        assert!(mapper.process_event(&make_sync_event()).is_some());

        // The release of the d-pad was among the dropped events
        assert!(mapper.process_event(&make_dropped_event()).is_none());
        assert_eq!(mapper.state(), &JoyEvent::neutral());

        // Everything up to and including the next report is ignored
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0X, 1));
        assert!(mapper.process_event(&make_sync_event()).is_none());
        assert_eq!(mapper.state().axes[axes::D_PAD_LEFT_RIGHT], 0.0);

        // Then snapshots resume from neutral
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0X, -1));
        let snapshot = mapper.process_event(&make_sync_event()).unwrap();
        assert_eq!(snapshot.axes[axes::D_PAD_UP_DOWN], 0.0);
        assert_eq!(snapshot.axes[axes::D_PAD_LEFT_RIGHT], 1.0);
    }

    #[test]
    fn test_hat_values_are_exact() {
        let mut mapper = EventMapper::new();

        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0Y, -1));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0X, 1));
        assert_eq!(mapper.state().axes[axes::D_PAD_UP_DOWN], 1.0);
        assert_eq!(mapper.state().axes[axes::D_PAD_LEFT_RIGHT], -1.0);

        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0Y, 1));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0X, -1));
        assert_eq!(mapper.state().axes[axes::D_PAD_UP_DOWN], -1.0);
        assert_eq!(mapper.state().axes[axes::D_PAD_LEFT_RIGHT], 1.0);

        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0Y, 0));
        assert_eq!(mapper.state().axes[axes::D_PAD_UP_DOWN], 0.0);
    }

    #[test]
    fn test_trigger_normalization() {
        assert_eq!(normalize_trigger(0), 1.0);
        assert_eq!(normalize_trigger(255), -1.0);
        assert!(normalize_trigger(127) > 0.0);
        assert!(normalize_trigger(128) < 0.0);
    }

    #[test]
    fn test_trigger_untouched_reads_zero() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RZ, 255));
        assert_eq!(mapper.state().axes[axes::LEFT_TRIGGER], 0.0);
        assert_eq!(mapper.state().axes[axes::RIGHT_TRIGGER], -1.0);
    }

    #[test]
    fn test_stick_normalization() {
        assert_eq!(normalize_stick(0), 0.0);
        assert_eq!(normalize_stick(-32768), 1.0);
        assert_eq!(normalize_stick(32767), -1.0);

        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, -32768));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RY, 32767));
        assert_eq!(mapper.state().axes[axes::LEFT_JOY_LEFT_RIGHT], 1.0);
        assert_eq!(mapper.state().axes[axes::RIGHT_JOY_UP_DOWN], -1.0);
    }

    #[test]
    fn test_button_mapping() {
        let cases = [
            (Key::BTN_SOUTH, buttons::A),
            (Key::BTN_EAST, buttons::B),
            (Key::BTN_NORTH, buttons::X),
            (Key::BTN_WEST, buttons::Y),
            (Key::BTN_TL, buttons::LB),
            (Key::BTN_TR, buttons::RB),
            (Key::BTN_SELECT, buttons::BACK),
            (Key::BTN_START, buttons::START),
            (Key::BTN_MODE, buttons::XBOX),
            (Key::BTN_THUMBL, buttons::PRESS_LEFT_JOY),
            (Key::BTN_THUMBR, buttons::PRESS_RIGHT_JOY),
        ];

        for (key, index) in cases {
            let mut mapper = EventMapper::new();
            mapper.process_event(&make_key_event(key, true));
            assert!(mapper.state().button(index), "{:?} should set button {}", key, index);
            assert_eq!(mapper.state().buttons.iter().sum::<i32>(), 1);

            mapper.process_event(&make_key_event(key, false));
            assert!(!mapper.state().button(index));
        }
    }

    #[test]
    fn test_unknown_inputs_ignored() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_PRESSURE, 100));
        mapper.process_event(&make_key_event(Key::BTN_TOUCH, true));
        assert_eq!(mapper.state(), &JoyEvent::neutral());
    }

    #[test]
    fn test_reset() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0X, 1));
        mapper.process_event(&make_key_event(Key::BTN_SOUTH, true));
        mapper.reset();
        assert_eq!(mapper.state(), &JoyEvent::neutral());
    }
}
