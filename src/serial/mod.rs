//! # Serial Output Module
//!
//! Handles the RS-485 serial sink for Pelco-D frames.
//!
//! This module handles:
//! - Opening the configured port with Pelco-D line settings (8N1, no flow
//!   control)
//! - Writing and flushing raw 7-byte frames
//! - The null-device convention: a sink configured as `/dev/null` is
//!   disabled and nothing is opened or written

use tokio_serial::SerialPortBuilderExt;
use tracing::debug;

use crate::error::{CctvPtzError, Result};
use crate::pelco::PelcoFrame;

pub mod port_trait;

use port_trait::{PortIo, TokioSerialPort};

/// Configured serial path that disables the sink.
pub const NULL_DEVICE: &str = "/dev/null";

/// Returns true when the configured serial path enables the sink.
#[must_use]
pub fn sink_enabled(path: &str) -> bool {
    path != NULL_DEVICE
}

/// Pelco-D serial port handler.
///
/// Owns an already-open write handle to the RS-485 adapter driving the
/// camera bus.
pub struct PelcoSerial {
    port: Box<dyn PortIo>,
    device_path: String,
    baud_rate: u32,
}

impl std::fmt::Debug for PelcoSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PelcoSerial")
            .field("device_path", &self.device_path)
            .field("baud_rate", &self.baud_rate)
            .finish_non_exhaustive()
    }
}

impl PelcoSerial {
    /// Opens the serial port with Pelco-D settings: the configured baud
    /// rate, 8 data bits, no parity, 1 stop bit, no flow control.
    ///
    /// # Errors
    ///
    /// Returns [`CctvPtzError::DeviceUnavailable`] if the port cannot be
    /// opened.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| CctvPtzError::DeviceUnavailable(format!("{path}: {e}")))?;

        Ok(Self {
            port: Box::new(TokioSerialPort::new(port)),
            device_path: path.to_string(),
            baud_rate,
        })
    }

    /// Wraps an already-open port. The seam used by tests.
    #[must_use]
    pub fn with_port(port: Box<dyn PortIo>, device_path: &str, baud_rate: u32) -> Self {
        Self {
            port,
            device_path: device_path.to_string(),
            baud_rate,
        }
    }

    /// Writes one frame's raw bytes and flushes the port.
    ///
    /// # Errors
    ///
    /// Returns [`CctvPtzError::DeviceUnavailable`] on write or flush
    /// failure.
    pub async fn send_frame(&mut self, frame: &PelcoFrame) -> Result<()> {
        self.port.write_all(frame.as_bytes()).await.map_err(|e| {
            CctvPtzError::DeviceUnavailable(format!("{}: write failed: {e}", self.device_path))
        })?;

        self.port.flush().await.map_err(|e| {
            CctvPtzError::DeviceUnavailable(format!("{}: flush failed: {e}", self.device_path))
        })?;

        debug!("sent frame {}", frame.encode_hex());
        Ok(())
    }

    /// The path of the opened device.
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// The configured baud rate.
    #[must_use]
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}
