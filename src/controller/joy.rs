//! # Joy Input Event
//!
//! A snapshot of every gamepad axis and button, addressed positionally.
//!
//! The positions follow the Xbox 360 joystick layout used by the MCU firmware
//! bring-up tools, so a recorded snapshot and a live one index the same way.
//!
//! ## Axes (-1.0 to 1.0)
//!
//! | Axis | Index | Convention |
//! |------|-------|------------|
//! | Left stick left/right | 0 | L = +1.0, R = -1.0 |
//! | Left stick up/down | 1 | U = +1.0, D = -1.0 |
//! | Left trigger | 2 | Released = +1.0, pressed = -1.0 |
//! | Right stick left/right | 3 | L = +1.0, R = -1.0 |
//! | Right stick up/down | 4 | U = +1.0, D = -1.0 |
//! | Right trigger | 5 | Released = +1.0, pressed = -1.0 |
//! | D-Pad left/right | 6 | L = +1.0, R = -1.0 |
//! | D-Pad up/down | 7 | U = +1.0, D = -1.0 |
//!
//! Triggers read 0.0 until they first report, which counts as released.
//!
//! ## Buttons (0 = released, 1 = pressed)
//!
//! | Button | Index |
//! |--------|-------|
//! | A | 0 |
//! | B | 1 |
//! | X | 2 |
//! | Y | 3 |
//! | LB | 4 |
//! | RB | 5 |
//! | Back | 6 |
//! | Start | 7 |
//! | Xbox | 8 |
//! | Left stick press | 9 |
//! | Right stick press | 10 |

use crate::error::{JointControllerError, Result};

/// Axis indices for semantic access.
pub mod axes {
    pub const LEFT_JOY_LEFT_RIGHT: usize = 0;
    pub const LEFT_JOY_UP_DOWN: usize = 1;
    pub const LEFT_TRIGGER: usize = 2;
    pub const RIGHT_JOY_LEFT_RIGHT: usize = 3;
    pub const RIGHT_JOY_UP_DOWN: usize = 4;
    pub const RIGHT_TRIGGER: usize = 5;
    /// Drives the distal joint.
    pub const D_PAD_LEFT_RIGHT: usize = 6;
    /// Drives the proximal joint.
    pub const D_PAD_UP_DOWN: usize = 7;
}

/// Button indices for semantic access.
pub mod buttons {
    pub const A: usize = 0;
    pub const B: usize = 1;
    pub const X: usize = 2;
    pub const Y: usize = 3;
    pub const LB: usize = 4;
    pub const RB: usize = 5;
    pub const BACK: usize = 6;
    pub const START: usize = 7;
    pub const XBOX: usize = 8;
    pub const PRESS_LEFT_JOY: usize = 9;
    pub const PRESS_RIGHT_JOY: usize = 10;
}

/// Number of axes in a full snapshot.
pub const NUM_AXES: usize = 8;

/// Number of buttons in a full snapshot.
pub const NUM_BUTTONS: usize = 11;

/// One gamepad snapshot.
///
/// Axes and buttons are kept as plain vectors because a snapshot may come
/// from a device that reports fewer entries than the table above. Reads go
/// through [`JoyEvent::axis`] and [`JoyEvent::button`], which report a
/// missing index as an error instead of panicking.
///
/// # Examples
///
/// ```
/// use joint_controller::controller::joy::{axes, JoyEvent};
///
/// let mut event = JoyEvent::neutral();
/// event.axes[axes::D_PAD_UP_DOWN] = 1.0;
/// assert_eq!(event.axis(axes::D_PAD_UP_DOWN).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoyEvent {
    /// Continuous axis values in [-1.0, 1.0].
    pub axes: Vec<f32>,
    /// Button states, 0 or 1.
    pub buttons: Vec<i32>,
}

impl JoyEvent {
    /// Creates an event from raw axis and button arrays.
    #[must_use]
    pub fn new(axes: Vec<f32>, buttons: Vec<i32>) -> Self {
        Self { axes, buttons }
    }

    /// Creates a full-size snapshot with every axis at 0.0 and every button released.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            axes: vec![0.0; NUM_AXES],
            buttons: vec![0; NUM_BUTTONS],
        }
    }

    /// Reads an axis by index.
    ///
    /// # Errors
    ///
    /// Returns `MissingAxis` if the snapshot is shorter than `index + 1`.
    pub fn axis(&self, index: usize) -> Result<f32> {
        self.axes
            .get(index)
            .copied()
            .ok_or(JointControllerError::MissingAxis {
                index,
                len: self.axes.len(),
            })
    }

    /// Reads a button by index. Missing buttons read as released.
    #[must_use]
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(|&b| b != 0)
    }

    /// Returns true if the trigger axis at `index` reads as pressed.
    ///
    /// A trigger counts as pressed once it passes its midpoint, i.e. the axis
    /// value drops below 0.0.
    ///
    /// # Errors
    ///
    /// Returns `MissingAxis` if the trigger axis is absent.
    pub fn trigger_pressed(&self, index: usize) -> Result<bool> {
        Ok(self.axis(index)? < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_has_full_table() {
        let event = JoyEvent::neutral();
        assert_eq!(event.axes.len(), NUM_AXES);
        assert_eq!(event.buttons.len(), NUM_BUTTONS);
        assert!(event.axes.iter().all(|&a| a == 0.0));
        assert!(event.buttons.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_axis_indices_fit_table() {
        for index in [
            axes::LEFT_JOY_LEFT_RIGHT,
            axes::LEFT_JOY_UP_DOWN,
            axes::LEFT_TRIGGER,
            axes::RIGHT_JOY_LEFT_RIGHT,
            axes::RIGHT_JOY_UP_DOWN,
            axes::RIGHT_TRIGGER,
            axes::D_PAD_LEFT_RIGHT,
            axes::D_PAD_UP_DOWN,
        ] {
            assert!(index < NUM_AXES);
        }
        assert_eq!(buttons::PRESS_RIGHT_JOY, NUM_BUTTONS - 1);
    }

    #[test]
    fn test_axis_missing_returns_error() {
        let event = JoyEvent::new(vec![0.0; 3], vec![]);
        match event.axis(axes::D_PAD_UP_DOWN) {
            Err(JointControllerError::MissingAxis { index, len }) => {
                assert_eq!(index, 7);
                assert_eq!(len, 3);
            }
            other => panic!("Expected MissingAxis, got: {:?}", other),
        }
    }

    #[test]
    fn test_button_missing_reads_released() {
        let event = JoyEvent::new(vec![], vec![1]);
        assert!(event.button(buttons::A));
        assert!(!event.button(buttons::XBOX));
    }

    #[test]
    fn test_trigger_pressed_threshold() {
        let mut event = JoyEvent::neutral();

        // Never touched
        assert!(!event.trigger_pressed(axes::LEFT_TRIGGER).unwrap());

        event.axes[axes::LEFT_TRIGGER] = 1.0;
        assert!(!event.trigger_pressed(axes::LEFT_TRIGGER).unwrap());

        event.axes[axes::LEFT_TRIGGER] = -0.01;
        assert!(event.trigger_pressed(axes::LEFT_TRIGGER).unwrap());

        event.axes[axes::LEFT_TRIGGER] = -1.0;
        assert!(event.trigger_pressed(axes::LEFT_TRIGGER).unwrap());
    }
}
