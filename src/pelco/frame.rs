//! # Pelco-D Frame Codec
//!
//! Builds, addresses, checksums, and hex-encodes/decodes the fixed 7-byte
//! Pelco-D frame.
//!
//! ## Frame layout
//!
//! | Offset | Field    | Meaning                           |
//! |--------|----------|-----------------------------------|
//! | 0      | sync     | constant 0xFF                     |
//! | 1      | address  | device address, 0-255             |
//! | 2      | command1 | iris open/close bits              |
//! | 3      | command2 | pan/tilt/zoom direction bits      |
//! | 4      | data1    | pan speed magnitude, 0-63         |
//! | 5      | data2    | tilt speed magnitude, 0-63        |
//! | 6      | checksum | sum of bytes 1..5 mod 256         |
//!
//! The checksum must be the last transformation applied before a frame
//! leaves the codec; a frame is complete only after checksum assignment.

use crate::error::{CctvPtzError, Result};

/// Pelco-D frame sync byte (always 0xFF)
pub const PELCO_SYNC_BYTE: u8 = 0xFF;

/// Size of a Pelco-D frame on the wire
pub const PELCO_FRAME_SIZE: usize = 7;

/// Length of a hex-encoded frame (two characters per byte)
pub const PELCO_FRAME_HEX_LEN: usize = PELCO_FRAME_SIZE * 2;

/// Maximum pan/tilt speed magnitude carried in the data bytes
pub const PELCO_MAX_SPEED: u8 = 0x3F;

/// Byte offsets within a frame
mod offset {
    pub const SYNC: usize = 0;
    pub const ADDR: usize = 1;
    pub const COMMAND_1: usize = 2;
    pub const COMMAND_2: usize = 3;
    pub const DATA_1: usize = 4;
    pub const DATA_2: usize = 5;
    pub const CHECKSUM: usize = 6;
}

/// One complete 7-byte Pelco-D protocol message.
///
/// Two frames are equal iff all 7 bytes match.
///
/// # Examples
///
/// ```
/// use cctv_ptz::pelco::PelcoFrame;
///
/// let frame = PelcoFrame::new().with_address(10).with_checksum();
/// assert_eq!(frame.address(), 10);
/// assert_eq!(frame.encode_hex(), "ff0a000000000a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PelcoFrame([u8; PELCO_FRAME_SIZE]);

impl Default for PelcoFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl PelcoFrame {
    /// Creates a frame with the sync byte set and all other bytes zero.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; PELCO_FRAME_SIZE];
        bytes[offset::SYNC] = PELCO_SYNC_BYTE;
        Self(bytes)
    }

    /// Returns the device address byte.
    #[must_use]
    pub fn address(&self) -> u8 {
        self.0[offset::ADDR]
    }

    /// Sets the device address byte.
    ///
    /// The protocol's address field is 8 bits wide; callers pass logical
    /// addresses 0-255 and arithmetic on them wraps mod 256.
    pub fn set_address(&mut self, addr: u8) {
        self.0[offset::ADDR] = addr;
    }

    /// Builder form of [`set_address`](Self::set_address).
    #[must_use]
    pub fn with_address(mut self, addr: u8) -> Self {
        self.set_address(addr);
        self
    }

    /// Returns the command1 byte (iris bits).
    #[must_use]
    pub fn command1(&self) -> u8 {
        self.0[offset::COMMAND_1]
    }

    /// Sets the command1 byte (iris bits).
    pub fn set_command1(&mut self, value: u8) {
        self.0[offset::COMMAND_1] = value;
    }

    /// Returns the command2 byte (pan/tilt/zoom direction bits).
    #[must_use]
    pub fn command2(&self) -> u8 {
        self.0[offset::COMMAND_2]
    }

    /// Sets the command2 byte (pan/tilt/zoom direction bits).
    pub fn set_command2(&mut self, value: u8) {
        self.0[offset::COMMAND_2] = value;
    }

    /// Returns the data1 byte (pan speed).
    #[must_use]
    pub fn data1(&self) -> u8 {
        self.0[offset::DATA_1]
    }

    /// Sets the data1 byte (pan speed).
    pub fn set_data1(&mut self, value: u8) {
        self.0[offset::DATA_1] = value;
    }

    /// Returns the data2 byte (tilt speed).
    #[must_use]
    pub fn data2(&self) -> u8 {
        self.0[offset::DATA_2]
    }

    /// Sets the data2 byte (tilt speed).
    pub fn set_data2(&mut self, value: u8) {
        self.0[offset::DATA_2] = value;
    }

    /// Returns the checksum byte.
    #[must_use]
    pub fn checksum(&self) -> u8 {
        self.0[offset::CHECKSUM]
    }

    /// Recomputes the checksum byte from bytes 1-5.
    ///
    /// Must be the last transformation applied to a frame. Idempotent:
    /// the checksum depends only on bytes 1-5, so applying it twice
    /// yields the same frame as applying it once.
    pub fn apply_checksum(&mut self) {
        self.0[offset::CHECKSUM] = self.0[offset::ADDR]
            .wrapping_add(self.0[offset::COMMAND_1])
            .wrapping_add(self.0[offset::COMMAND_2])
            .wrapping_add(self.0[offset::DATA_1])
            .wrapping_add(self.0[offset::DATA_2]);
    }

    /// Builder form of [`apply_checksum`](Self::apply_checksum).
    #[must_use]
    pub fn with_checksum(mut self) -> Self {
        self.apply_checksum();
        self
    }

    /// Returns the raw wire bytes of the frame.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PELCO_FRAME_SIZE] {
        &self.0
    }

    /// Encodes the frame as exactly 14 lowercase hex characters, no
    /// separators.
    ///
    /// # Examples
    ///
    /// ```
    /// use cctv_ptz::pelco::PelcoFrame;
    ///
    /// let hex = PelcoFrame::new().encode_hex();
    /// assert_eq!(hex, "ff000000000000");
    /// ```
    #[must_use]
    pub fn encode_hex(&self) -> String {
        let mut text = String::with_capacity(PELCO_FRAME_HEX_LEN);
        for byte in self.0 {
            use std::fmt::Write;
            // infallible for String
            let _ = write!(text, "{byte:02x}");
        }
        text
    }

    /// Decodes a frame from a hex string.
    ///
    /// The input must be exactly 14 hex characters decoding to 7 bytes;
    /// anything shorter, longer, or non-hex is rejected as
    /// [`CctvPtzError::MalformedHex`]. The checksum byte is taken verbatim
    /// from the input and not re-verified.
    ///
    /// # Errors
    ///
    /// Returns [`CctvPtzError::MalformedHex`] if the text is not valid hex
    /// or does not decode to exactly 7 bytes.
    pub fn decode_hex(text: &str) -> Result<Self> {
        if text.len() != PELCO_FRAME_HEX_LEN || !text.is_ascii() {
            return Err(CctvPtzError::MalformedHex(format!(
                "expected {PELCO_FRAME_HEX_LEN} hex characters, got {:?}",
                text
            )));
        }

        let mut bytes = [0u8; PELCO_FRAME_SIZE];
        for (i, slot) in bytes.iter_mut().enumerate() {
            let pair = &text[i * 2..i * 2 + 2];
            *slot = u8::from_str_radix(pair, 16)
                .map_err(|_| CctvPtzError::MalformedHex(format!("invalid hex byte {pair:?}")))?;
        }

        Ok(Self(bytes))
    }
}
