//! Trait abstraction for serial port operations to enable testing

use async_trait::async_trait;
use std::io;

/// Trait for serial port I/O operations
#[async_trait]
pub trait PortIo: Send {
    /// Write all data to the port
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer
    async fn flush(&mut self) -> io::Result<()>;
}

/// Wrapper around tokio_serial::SerialStream that implements PortIo
pub struct TokioSerialPort {
    port: tokio_serial::SerialStream,
}

impl TokioSerialPort {
    pub fn new(port: tokio_serial::SerialStream) -> Self {
        Self { port }
    }
}

#[async_trait]
impl PortIo for TokioSerialPort {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.flush().await
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    /// Mock serial port for testing. Records each write with the instant it
    /// happened so pacing tests can check inter-frame spacing.
    #[derive(Clone)]
    pub struct MockPort {
        pub written: Arc<Mutex<Vec<(Instant, Vec<u8>)>>>,
        pub write_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockPort {
        pub fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
                write_error: Arc::new(Mutex::new(None)),
            }
        }

        pub fn written_frames(&self) -> Vec<Vec<u8>> {
            self.written
                .lock()
                .unwrap()
                .iter()
                .map(|(_, data)| data.clone())
                .collect()
        }

        pub fn write_instants(&self) -> Vec<Instant> {
            self.written
                .lock()
                .unwrap()
                .iter()
                .map(|(at, _)| *at)
                .collect()
        }

        pub fn set_write_error(&self, error: io::ErrorKind) {
            *self.write_error.lock().unwrap() = Some(error);
        }
    }

    #[async_trait]
    impl PortIo for MockPort {
        async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.write_error.lock().unwrap() {
                return Err(io::Error::new(error, "mock write error"));
            }
            self.written
                .lock()
                .unwrap()
                .push((Instant::now(), data.to_vec()));
            Ok(())
        }

        async fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
