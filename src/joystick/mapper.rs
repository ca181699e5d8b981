//! # PTZ Input Mapper
//!
//! Converts a controller snapshot into the Pelco-D command/data fields:
//! pan/tilt direction and speed, zoom, iris, and the camera-menu shortcut.
//!
//! ## Command bit assignments
//!
//! | Byte | Bit | Meaning |
//! |------|-----|---------|
//! | command1 | 1 | iris open |
//! | command1 | 2 | iris close |
//! | command2 | 1 | pan right |
//! | command2 | 2 | pan left |
//! | command2 | 3 | tilt up |
//! | command2 | 4 | tilt down |
//! | command2 | 5 | zoom in |
//! | command2 | 6 | zoom out |
//!
//! Pan, tilt, and zoom are OR-combined into command2. The menu shortcut
//! overrides everything: it is the Pelco-D "go to preset 95" command, which
//! opens the on-screen menu on most camera heads.

use crate::pelco::frame::{PelcoFrame, PELCO_MAX_SPEED};

use super::layout::PtzBindings;
use super::state::ControllerState;

/// command2: pan right (positive pan-x)
pub const PAN_RIGHT: u8 = 1 << 1;
/// command2: pan left (negative pan-x)
pub const PAN_LEFT: u8 = 1 << 2;
/// command2: tilt up (positive pan-y)
pub const TILT_UP: u8 = 1 << 3;
/// command2: tilt down (negative pan-y)
pub const TILT_DOWN: u8 = 1 << 4;
/// command2: zoom in
pub const ZOOM_IN: u8 = 1 << 5;
/// command2: zoom out
pub const ZOOM_OUT: u8 = 1 << 6;

/// command1: iris open
pub const IRIS_OPEN: u8 = 1 << 1;
/// command1: iris close
pub const IRIS_CLOSE: u8 = 1 << 2;

/// "go to preset 95" command2 byte
const MENU_COMMAND_2: u8 = 0x03;
/// "go to preset 95" data2 byte (preset number)
const MENU_DATA_2: u8 = 0x5F;

/// Maps a controller snapshot onto a frame's command/data region.
///
/// Reads the pan/tilt axes and the zoom/iris/menu buttons through the
/// binding table, then delegates to [`apply_command`]. Zoom-out is checked
/// before zoom-in when both bumpers are held.
#[must_use]
pub fn apply_state(
    frame: PelcoFrame,
    state: &ControllerState,
    bindings: &PtzBindings,
    max_speed: u8,
) -> PelcoFrame {
    let pan_x = bindings.pan_x.sample(state);
    let pan_y = bindings.pan_y.sample(state);
    let open_iris = state.is_pressed(bindings.open_iris);
    let close_iris = state.is_pressed(bindings.close_iris);
    let open_menu = state.is_pressed(bindings.open_menu);

    let zoom = if state.is_pressed(bindings.zoom_out) {
        -1.0
    } else if state.is_pressed(bindings.zoom_in) {
        1.0
    } else {
        0.0
    };

    apply_command(frame, pan_x, pan_y, zoom, open_iris, close_iris, open_menu, max_speed)
}

/// Writes normalized control values into a frame's command/data region.
///
/// `open_menu` takes absolute priority: the whole region is overwritten
/// with the preset-95 shortcut and no other input is considered. Otherwise
/// direction bits are set per axis sign (mutually exclusive per axis, zero
/// means no motion) and each speed byte is `max_speed * |axis|` truncated
/// toward zero. Iris open is evaluated before iris close.
///
/// `max_speed` is a caller-supplied ceiling, capped at the protocol's
/// maximum of 63.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn apply_command(
    mut frame: PelcoFrame,
    pan_x: f32,
    pan_y: f32,
    zoom: f32,
    open_iris: bool,
    close_iris: bool,
    open_menu: bool,
    max_speed: u8,
) -> PelcoFrame {
    if open_menu {
        frame.set_command1(0x00);
        frame.set_command2(MENU_COMMAND_2);
        frame.set_data1(0x00);
        frame.set_data2(MENU_DATA_2);
        return frame;
    }

    let ceiling = max_speed.min(PELCO_MAX_SPEED) as f32;
    let mut command2 = frame.command2();

    if pan_x > 0.0 {
        command2 |= PAN_RIGHT;
    } else if pan_x < 0.0 {
        command2 |= PAN_LEFT;
    }
    frame.set_data1((ceiling * pan_x.abs()) as u8);

    if pan_y > 0.0 {
        command2 |= TILT_UP;
    } else if pan_y < 0.0 {
        command2 |= TILT_DOWN;
    }
    frame.set_data2((ceiling * pan_y.abs()) as u8);

    if zoom > 0.0 {
        command2 |= ZOOM_IN;
    } else if zoom < 0.0 {
        command2 |= ZOOM_OUT;
    }
    frame.set_command2(command2);

    let mut command1 = frame.command1();
    if open_iris {
        command1 |= IRIS_OPEN;
    } else if close_iris {
        command1 |= IRIS_CLOSE;
    }
    frame.set_command1(command1);

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::layout::{button, channel, AXIS_RANGE};

    const MAX_SPEED: u8 = 0x3F;

    fn map(pan_x: f32, pan_y: f32, zoom: f32) -> PelcoFrame {
        apply_command(PelcoFrame::new(), pan_x, pan_y, zoom, false, false, false, MAX_SPEED)
    }

    #[test]
    fn test_neutral_input_leaves_command_region_zero() {
        let frame = map(0.0, 0.0, 0.0);
        assert_eq!(frame.command1(), 0);
        assert_eq!(frame.command2(), 0);
        assert_eq!(frame.data1(), 0);
        assert_eq!(frame.data2(), 0);
    }

    #[test]
    fn test_pan_right_sets_bit_and_speed() {
        let frame = map(1.0, 0.0, 0.0);
        assert_eq!(frame.command2(), PAN_RIGHT);
        assert_eq!(frame.data1(), MAX_SPEED);
    }

    #[test]
    fn test_pan_left_sets_bit_and_speed() {
        let frame = map(-0.5, 0.0, 0.0);
        assert_eq!(frame.command2(), PAN_LEFT);
        assert_eq!(frame.data1(), (MAX_SPEED as f32 * 0.5) as u8);
    }

    #[test]
    fn test_pan_direction_bits_are_mutually_exclusive() {
        assert_eq!(map(1.0, 0.0, 0.0).command2() & PAN_LEFT, 0);
        assert_eq!(map(-1.0, 0.0, 0.0).command2() & PAN_RIGHT, 0);
    }

    #[test]
    fn test_tilt_up_and_down() {
        let up = map(0.0, 0.75, 0.0);
        assert_eq!(up.command2(), TILT_UP);
        assert_eq!(up.data2(), (MAX_SPEED as f32 * 0.75) as u8);

        let down = map(0.0, -1.0, 0.0);
        assert_eq!(down.command2(), TILT_DOWN);
        assert_eq!(down.data2(), MAX_SPEED);
    }

    #[test]
    fn test_zoom_bits() {
        assert_eq!(map(0.0, 0.0, 1.0).command2(), ZOOM_IN);
        assert_eq!(map(0.0, 0.0, -1.0).command2(), ZOOM_OUT);
    }

    #[test]
    fn test_axes_or_combine_into_command2() {
        let frame = map(1.0, -1.0, 1.0);
        assert_eq!(frame.command2(), PAN_RIGHT | TILT_DOWN | ZOOM_IN);
    }

    #[test]
    fn test_iris_open_beats_close() {
        let open = apply_command(PelcoFrame::new(), 0.0, 0.0, 0.0, true, false, false, MAX_SPEED);
        assert_eq!(open.command1(), IRIS_OPEN);

        let close = apply_command(PelcoFrame::new(), 0.0, 0.0, 0.0, false, true, false, MAX_SPEED);
        assert_eq!(close.command1(), IRIS_CLOSE);

        let both = apply_command(PelcoFrame::new(), 0.0, 0.0, 0.0, true, true, false, MAX_SPEED);
        assert_eq!(both.command1(), IRIS_OPEN);
    }

    #[test]
    fn test_menu_overrides_everything() {
        let frame = apply_command(PelcoFrame::new(), 1.0, -1.0, 1.0, true, true, true, MAX_SPEED);
        assert_eq!(frame.command1(), 0x00);
        assert_eq!(frame.command2(), 0x03);
        assert_eq!(frame.data1(), 0x00);
        assert_eq!(frame.data2(), 0x5F);
    }

    #[test]
    fn test_speed_truncates_toward_zero() {
        // 63 * 0.48049... = 30.27 -> 30
        let normalized = 11808.0_f32 / 24575.0;
        let frame = map(normalized, 0.0, 0.0);
        assert_eq!(frame.data1(), 0x1E);
    }

    #[test]
    fn test_max_speed_ceiling_is_scaled() {
        let frame = apply_command(PelcoFrame::new(), 1.0, 0.0, 0.0, false, false, false, 31);
        assert_eq!(frame.data1(), 31);

        let half = apply_command(PelcoFrame::new(), 0.5, 0.0, 0.0, false, false, false, 31);
        assert_eq!(half.data1(), 15);
    }

    #[test]
    fn test_max_speed_capped_at_protocol_limit() {
        let frame = apply_command(PelcoFrame::new(), 1.0, 0.0, 0.0, false, false, false, 255);
        assert_eq!(frame.data1(), PELCO_MAX_SPEED);
    }

    #[test]
    fn test_apply_state_reads_bindings() {
        let bindings = PtzBindings::xbox();
        let mut state = ControllerState::default();
        state.axes[channel::LEFT_STICK_X] = AXIS_RANGE;
        state.buttons = button::LEFT_BUMPER | button::A;

        let frame = apply_state(PelcoFrame::new(), &state, &bindings, MAX_SPEED);
        assert_eq!(frame.command2(), PAN_RIGHT | ZOOM_IN);
        assert_eq!(frame.command1(), IRIS_OPEN);
        assert_eq!(frame.data1(), MAX_SPEED);
    }

    #[test]
    fn test_apply_state_zoom_out_checked_first() {
        let bindings = PtzBindings::xbox();
        let state = ControllerState {
            buttons: button::LEFT_BUMPER | button::RIGHT_BUMPER,
            ..Default::default()
        };

        let frame = apply_state(PelcoFrame::new(), &state, &bindings, MAX_SPEED);
        assert_eq!(frame.command2(), ZOOM_OUT);
    }

    #[test]
    fn test_apply_state_menu_priority_end_to_end() {
        let bindings = PtzBindings::xbox();
        let mut state = ControllerState::default();
        state.axes[channel::LEFT_STICK_X] = AXIS_RANGE;
        state.axes[channel::RIGHT_STICK_Y] = -AXIS_RANGE;
        state.buttons = button::START | button::A | button::LEFT_BUMPER;

        let frame = apply_state(PelcoFrame::new(), &state, &bindings, MAX_SPEED);
        let expected =
            apply_command(PelcoFrame::new(), 0.0, 0.0, 0.0, false, false, true, MAX_SPEED);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_end_to_end_raw_axis_to_speed_byte() {
        // raw 20000 on a +/-32767 stick with deadzone 8192 -> ~0.4826 -> 30
        let bindings = PtzBindings::xbox();
        let mut state = ControllerState::default();
        state.axes[channel::LEFT_STICK_X] = 20000;

        let frame = apply_state(PelcoFrame::new(), &state, &bindings, MAX_SPEED);
        assert_eq!(frame.data1(), 0x1E);
        assert_eq!(frame.command2(), PAN_RIGHT);
    }
}
