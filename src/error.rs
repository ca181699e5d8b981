//! # Error Types
//!
//! Custom error types for cctv-ptz using `thiserror`.

use thiserror::Error;

/// Main error type for cctv-ptz
#[derive(Debug, Error)]
pub enum CctvPtzError {
    /// A frame failed to hex-decode, or decoded to the wrong length
    #[error("malformed hex frame: {0}")]
    MalformedHex(String),

    /// A playback line could not be parsed (non-fatal, the line is skipped)
    #[error("malformed playback line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// The serial device could not be opened or written
    #[error("serial device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The controller device could not be opened
    #[error("joystick unavailable: {0}")]
    InputUnavailable(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cctv-ptz
pub type Result<T> = std::result::Result<T, CctvPtzError>;
