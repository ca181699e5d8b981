//! # Controller Layout
//!
//! Process-wide controller-layout data: axis channel ordering, button bit
//! masks, and the PTZ control bindings. All of it is immutable
//! configuration constructed once at startup and passed by reference into
//! the mapper and the live loop.
//!
//! ## Bindings (Xbox-class pad)
//!
//! | Control | Input |
//! |---------|-------|
//! | Pan | Left Stick X |
//! | Tilt | Right Stick Y |
//! | Zoom in / out | Left / Right Bumper |
//! | Iris open / close | A / B |
//! | Camera menu | Start |
//! | Address +1 / -1 | Y / X |
//! | Timer reset | Back |
//! | Mark left / right | Left / Right Trigger |

use super::axis::AxisSpec;

/// Full deflection of an axis after rescaling to the symmetric range.
pub const AXIS_RANGE: i32 = 32767;

/// Deadzone magnitude for analog sticks.
pub const STICK_DEADZONE: i32 = 8192;

/// Deadzone magnitude for triggers and the directional pad.
pub const TRIGGER_DEADZONE: i32 = 1000;

/// Axis channel indices, in classic joystick-interface order.
pub mod channel {
    pub const LEFT_STICK_X: usize = 0;
    pub const LEFT_STICK_Y: usize = 1;
    pub const LEFT_TRIGGER: usize = 2;
    pub const RIGHT_STICK_X: usize = 3;
    pub const RIGHT_STICK_Y: usize = 4;
    pub const RIGHT_TRIGGER: usize = 5;
    pub const DPAD_X: usize = 6;
    pub const DPAD_Y: usize = 7;
}

/// Button bit masks, in classic joystick-interface order.
pub mod button {
    pub const A: u32 = 1 << 0;
    pub const B: u32 = 1 << 1;
    pub const X: u32 = 1 << 2;
    pub const Y: u32 = 1 << 3;
    pub const LEFT_BUMPER: u32 = 1 << 4;
    pub const RIGHT_BUMPER: u32 = 1 << 5;
    pub const BACK: u32 = 1 << 6;
    pub const START: u32 = 1 << 7;
    pub const GUIDE: u32 = 1 << 8;
}

/// Axis descriptors for an Xbox-class pad.
pub mod xbox {
    use super::channel;
    use super::{AxisSpec, AXIS_RANGE, STICK_DEADZONE, TRIGGER_DEADZONE};

    pub const LEFT_STICK_X: AxisSpec =
        AxisSpec::new(channel::LEFT_STICK_X, -AXIS_RANGE, AXIS_RANGE, STICK_DEADZONE, false);
    // vertical sticks report down as positive; invert so up is positive
    pub const LEFT_STICK_Y: AxisSpec =
        AxisSpec::new(channel::LEFT_STICK_Y, -AXIS_RANGE, AXIS_RANGE, STICK_DEADZONE, true);
    pub const RIGHT_STICK_X: AxisSpec =
        AxisSpec::new(channel::RIGHT_STICK_X, -AXIS_RANGE, AXIS_RANGE, STICK_DEADZONE, false);
    pub const RIGHT_STICK_Y: AxisSpec =
        AxisSpec::new(channel::RIGHT_STICK_Y, -AXIS_RANGE, AXIS_RANGE, STICK_DEADZONE, true);
    pub const LEFT_TRIGGER: AxisSpec =
        AxisSpec::new(channel::LEFT_TRIGGER, -AXIS_RANGE, AXIS_RANGE, TRIGGER_DEADZONE, false);
    pub const RIGHT_TRIGGER: AxisSpec =
        AxisSpec::new(channel::RIGHT_TRIGGER, -AXIS_RANGE, AXIS_RANGE, TRIGGER_DEADZONE, false);
    pub const DPAD_X: AxisSpec =
        AxisSpec::new(channel::DPAD_X, -AXIS_RANGE, AXIS_RANGE, TRIGGER_DEADZONE, false);
    pub const DPAD_Y: AxisSpec =
        AxisSpec::new(channel::DPAD_Y, -AXIS_RANGE, AXIS_RANGE, TRIGGER_DEADZONE, false);
}

/// Binds PTZ controls and app controls to controller inputs.
#[derive(Debug, Clone)]
pub struct PtzBindings {
    // pan tilt zoom
    pub pan_x: AxisSpec,
    pub pan_y: AxisSpec,
    pub zoom_in: u32,
    pub zoom_out: u32,
    pub open_iris: u32,
    pub close_iris: u32,
    pub open_menu: u32,

    // misc app controls
    pub inc_address: u32,
    pub dec_address: u32,
    pub reset_timer: u32,
    pub mark_left: AxisSpec,
    pub mark_right: AxisSpec,
}

impl Default for PtzBindings {
    fn default() -> Self {
        Self::xbox()
    }
}

impl PtzBindings {
    /// The default Xbox-class binding table.
    #[must_use]
    pub fn xbox() -> Self {
        Self {
            pan_x: xbox::LEFT_STICK_X,
            pan_y: xbox::RIGHT_STICK_Y,
            zoom_in: button::LEFT_BUMPER,
            zoom_out: button::RIGHT_BUMPER,
            open_iris: button::A,
            close_iris: button::B,
            open_menu: button::START,

            inc_address: button::Y,
            dec_address: button::X,
            reset_timer: button::BACK,
            mark_left: xbox::LEFT_TRIGGER,
            mark_right: xbox::RIGHT_TRIGGER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_masks_are_distinct_bits() {
        let masks = [
            button::A,
            button::B,
            button::X,
            button::Y,
            button::LEFT_BUMPER,
            button::RIGHT_BUMPER,
            button::BACK,
            button::START,
            button::GUIDE,
        ];
        let mut combined = 0u32;
        for mask in masks {
            assert_eq!(mask.count_ones(), 1);
            assert_eq!(combined & mask, 0, "mask 0x{mask:x} overlaps");
            combined |= mask;
        }
    }

    #[test]
    fn test_stick_specs_are_symmetric() {
        for spec in [
            xbox::LEFT_STICK_X,
            xbox::LEFT_STICK_Y,
            xbox::RIGHT_STICK_X,
            xbox::RIGHT_STICK_Y,
        ] {
            assert_eq!(spec.min, -spec.max);
            assert_eq!(spec.deadzone, STICK_DEADZONE);
        }
    }

    #[test]
    fn test_vertical_sticks_are_inverted() {
        assert!(xbox::LEFT_STICK_Y.inverted);
        assert!(xbox::RIGHT_STICK_Y.inverted);
        assert!(!xbox::LEFT_STICK_X.inverted);
        assert!(!xbox::RIGHT_STICK_X.inverted);
    }

    #[test]
    fn test_default_bindings() {
        let bindings = PtzBindings::default();
        assert_eq!(bindings.pan_x.index, channel::LEFT_STICK_X);
        assert_eq!(bindings.pan_y.index, channel::RIGHT_STICK_Y);
        assert_eq!(bindings.zoom_in, button::LEFT_BUMPER);
        assert_eq!(bindings.zoom_out, button::RIGHT_BUMPER);
        assert_eq!(bindings.open_menu, button::START);
        assert_eq!(bindings.mark_left.index, channel::LEFT_TRIGGER);
        assert_eq!(bindings.mark_right.index, channel::RIGHT_TRIGGER);
    }
}
