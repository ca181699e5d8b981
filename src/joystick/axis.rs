//! # Axis Normalization
//!
//! Converts raw bounded integer axis samples into a signed unit-range value
//! with deadzone and inversion applied.
//!
//! ## Deadzone
//!
//! A deadzone eliminates small stick movements near center to compensate
//! for physical control drift. Readings at or below the deadzone magnitude
//! map to 0.0; readings outside are rescaled so the remaining travel spans
//! the full unit range.

use super::state::ControllerState;

/// Immutable descriptor binding one logical control to one axis channel.
///
/// Bindings are configuration, not runtime state: each logical control
/// (pan-x, pan-y, a trigger used as a mark input) is bound to exactly one
/// `AxisSpec` at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpec {
    /// Input channel index into [`ControllerState::axes`].
    pub index: usize,
    /// Minimum raw value (symmetric around zero with `max`).
    pub min: i32,
    /// Maximum raw value.
    pub max: i32,
    /// Magnitude below which a reading is treated as centered.
    pub deadzone: i32,
    /// Flips the sign of the normalized value.
    pub inverted: bool,
}

impl AxisSpec {
    /// Creates an axis descriptor.
    #[must_use]
    pub const fn new(index: usize, min: i32, max: i32, deadzone: i32, inverted: bool) -> Self {
        Self {
            index,
            min,
            max,
            deadzone,
            inverted,
        }
    }

    /// Normalizes a raw axis reading to [-1.0, 1.0].
    ///
    /// Pure and deterministic:
    /// 1. If `inverted`, the raw value is negated.
    /// 2. Magnitudes at or below `deadzone` map to 0.0.
    /// 3. Otherwise the result is `(|value| - deadzone) / (max - deadzone)`
    ///    signed to match the value, clamped to 1.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use cctv_ptz::joystick::axis::AxisSpec;
    ///
    /// let spec = AxisSpec::new(0, -32767, 32767, 8192, false);
    /// assert_eq!(spec.normalize(0), 0.0);
    /// assert_eq!(spec.normalize(4000), 0.0);
    /// assert!((spec.normalize(32767) - 1.0).abs() < 1e-6);
    /// assert!((spec.normalize(20000) - 0.4805).abs() < 1e-3);
    /// ```
    #[must_use]
    pub fn normalize(&self, raw: i32) -> f32 {
        let mut value = raw as f32;
        if self.inverted {
            value = -value;
        }

        let deadzone = self.deadzone as f32;
        let max = self.max as f32;

        if value.abs() <= deadzone {
            return 0.0;
        }

        let magnitude = ((value.abs() - deadzone) / (max - deadzone)).min(1.0);
        magnitude.copysign(value)
    }

    /// Normalizes this axis's channel out of a controller snapshot.
    #[must_use]
    pub fn sample(&self, state: &ControllerState) -> f32 {
        self.normalize(state.axis(self.index))
    }
}
