//! # Joystick Input Source
//!
//! Gamepad detection, connection, and periodic state sampling via the Linux
//! evdev interface.
//!
//! ## Sampling model
//!
//! The device is not read event-by-event. A background task queries the
//! kernel's current absolute-axis and key state on a fixed period and
//! publishes one [`ControllerState`] snapshot per tick into a bounded
//! channel. A slow consumer causes samples to be dropped; the poll timer is
//! never blocked.
//!
//! ## Axis mapping (Xbox-class pad)
//!
//! | Channel | evdev code |
//! |---------|------------|
//! | Left Stick X/Y | ABS_X / ABS_Y |
//! | Left/Right Trigger | ABS_Z / ABS_RZ |
//! | Right Stick X/Y | ABS_RX / ABS_RY |
//! | D-Pad X/Y | ABS_HAT0X / ABS_HAT0Y |
//!
//! Raw readings are rescaled from the device-reported range to the layout's
//! symmetric range so the axis math is device-independent. A trigger at
//! rest therefore reads full negative, matching the legacy joystick
//! interface.

use std::path::Path;

use evdev::{AbsoluteAxisType, Device, Key};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{interval, Duration};
use tracing::{debug, warn};

use crate::error::{CctvPtzError, Result};

use super::layout::{button, AXIS_RANGE};
use super::state::{ControllerState, AXIS_CHANNELS};

/// Snapshot poll period.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bounded depth of the snapshot channel.
pub const SNAPSHOT_QUEUE_DEPTH: usize = 20;

/// evdev axis codes in channel order.
const AXIS_CODES: [AbsoluteAxisType; AXIS_CHANNELS] = [
    AbsoluteAxisType::ABS_X,
    AbsoluteAxisType::ABS_Y,
    AbsoluteAxisType::ABS_Z,
    AbsoluteAxisType::ABS_RX,
    AbsoluteAxisType::ABS_RY,
    AbsoluteAxisType::ABS_RZ,
    AbsoluteAxisType::ABS_HAT0X,
    AbsoluteAxisType::ABS_HAT0Y,
];

/// Button mask to evdev key code.
///
/// BTN_NORTH/BTN_WEST carry the historical xpad swap: BTN_NORTH is the X
/// button and BTN_WEST is Y.
const BUTTON_CODES: [(u32, Key); 9] = [
    (button::A, Key::BTN_SOUTH),
    (button::B, Key::BTN_EAST),
    (button::X, Key::BTN_NORTH),
    (button::Y, Key::BTN_WEST),
    (button::LEFT_BUMPER, Key::BTN_TL),
    (button::RIGHT_BUMPER, Key::BTN_TR),
    (button::BACK, Key::BTN_SELECT),
    (button::START, Key::BTN_START),
    (button::GUIDE, Key::BTN_MODE),
];

/// An open gamepad device.
pub struct JoystickDevice {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for JoystickDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoystickDevice")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl JoystickDevice {
    /// Opens the `index`-th gamepad found on the system.
    ///
    /// Scans `/dev/input/event*` in sorted order for deterministic selection
    /// and keeps devices that expose gamepad buttons (BTN_SOUTH) and an
    /// absolute X axis.
    ///
    /// # Errors
    ///
    /// Returns [`CctvPtzError::InputUnavailable`] if no matching device
    /// exists at that index.
    pub fn open_index(index: usize) -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(CctvPtzError::InputUnavailable(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| CctvPtzError::InputUnavailable(format!("failed to read /dev/input: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                CctvPtzError::InputUnavailable(format!("failed to read directory entry: {e}"))
            })?;

        // sorted scan keeps device selection deterministic across runs
        entries.sort_by_key(|entry| entry.path());

        let mut found = 0usize;
        for entry in entries {
            let path = entry.path();

            match path.file_name() {
                Some(name) if name.to_string_lossy().starts_with("event") => {}
                _ => continue,
            }

            match Device::open(&path) {
                Ok(device) => {
                    if !is_gamepad(&device) {
                        continue;
                    }

                    debug!("found gamepad candidate: {}", path.display());
                    if found == index {
                        return Ok(Self {
                            device,
                            device_path: path.to_string_lossy().to_string(),
                        });
                    }
                    found += 1;
                }
                Err(e) => {
                    debug!("could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(CctvPtzError::InputUnavailable(format!(
            "no gamepad found at index {index} ({found} detected)"
        )))
    }

    /// Opens a gamepad at an explicit evdev path.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path)
            .map_err(|e| CctvPtzError::InputUnavailable(format!("{}: {e}", path.display())))?;

        Ok(Self {
            device,
            device_path: path.to_string_lossy().to_string(),
        })
    }

    /// The evdev path this device was opened from.
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Human-readable device name, when the kernel reports one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }

    /// Number of absolute axes the device reports. Diagnostic only.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.device
            .supported_absolute_axes()
            .map_or(0, |axes| axes.iter().count())
    }

    /// Number of buttons the device reports. Diagnostic only.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.device
            .supported_keys()
            .map_or(0, |keys| keys.iter().count())
    }

    /// Captures the current controller state.
    ///
    /// Queries the kernel's absolute-axis and key state directly; this does
    /// not consume the device's event stream.
    pub fn snapshot(&mut self) -> Result<ControllerState> {
        let abs = self
            .device
            .get_abs_state()
            .map_err(|e| CctvPtzError::InputUnavailable(format!("axis state read failed: {e}")))?;
        let keys = self
            .device
            .get_key_state()
            .map_err(|e| CctvPtzError::InputUnavailable(format!("key state read failed: {e}")))?;

        let mut state = ControllerState::default();

        for (channel, axis) in AXIS_CODES.iter().enumerate() {
            let info = abs[axis.0 as usize];
            state.axes[channel] = rescale(info.value, info.minimum, info.maximum);
        }

        for (mask, key) in BUTTON_CODES {
            if keys.contains(key) {
                state.buttons |= mask;
            }
        }

        Ok(state)
    }
}

/// A device qualifies as a gamepad when it has gamepad buttons and at
/// least one analog stick axis.
fn is_gamepad(device: &Device) -> bool {
    let has_buttons = device
        .supported_keys()
        .map_or(false, |keys| keys.contains(Key::BTN_SOUTH));
    let has_stick = device
        .supported_absolute_axes()
        .map_or(false, |axes| axes.contains(AbsoluteAxisType::ABS_X));

    has_buttons && has_stick
}

/// Rescales a raw reading from `[min, max]` to the symmetric
/// `[-AXIS_RANGE, AXIS_RANGE]` range. Unreported axes (empty range) read 0.
fn rescale(value: i32, min: i32, max: i32) -> i32 {
    if max <= min {
        return 0;
    }

    let span = (max - min) as i64;
    let centered = (value - min) as i64 * 2 - span;
    (centered * AXIS_RANGE as i64 / span) as i32
}

/// Spawns the poll task: one snapshot per tick into a bounded channel.
///
/// Overflow drops the fresh sample so the timer never blocks on a slow
/// consumer. The task ends when the receiver is dropped or the device
/// stops answering.
pub fn spawn_poll_task(mut device: JoystickDevice) -> mpsc::Receiver<ControllerState> {
    let (tx, rx) = mpsc::channel(SNAPSHOT_QUEUE_DEPTH);

    tokio::spawn(async move {
        let mut ticker = interval(POLL_INTERVAL);

        loop {
            ticker.tick().await;

            let state = match device.snapshot() {
                Ok(state) => state,
                Err(e) => {
                    warn!("joystick sampling stopped: {e}");
                    break;
                }
            };

            match tx.try_send(state) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!("snapshot queue full, dropping sample");
                }
                Err(TrySendError::Closed(_)) => break,
            }
        }
    });

    rx
}

/// An input source that never yields a snapshot.
///
/// Used when no controller is available so record-only and playback
/// workflows keep working.
pub fn null_source() -> mpsc::Receiver<ControllerState> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let _tx = tx;
        std::future::pending::<()>().await;
    });

    rx
}
