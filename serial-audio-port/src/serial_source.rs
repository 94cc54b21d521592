//! Blocking byte source over a serial port.

use std::io::{ErrorKind, Read};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};

use serial_audio_core::models::error::CaptureError;
use serial_audio_core::traits::byte_source::ByteSource;

/// Serial line settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    /// Line speed (default: 115200).
    pub baud_rate: u32,

    /// Longest a single read blocks before returning an empty chunk
    /// (default: 100 ms). Bounds how long a stop request can go unnoticed.
    pub read_timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            read_timeout: Duration::from_millis(100),
        }
    }
}

/// An open serial port delivering raw frame bytes.
pub struct SerialByteSource {
    port_name: String,
    port: Option<Box<dyn SerialPort>>,
    read_buf: Vec<u8>,
}

impl SerialByteSource {
    /// Open `port_name` and discard anything the device sent before now.
    pub fn open(port_name: &str, settings: &SerialSettings) -> Result<Self, CaptureError> {
        log::info!("Opening {}...", port_name);

        let port_error = |reason: String| CaptureError::PortOpenFailed {
            port: port_name.to_string(),
            reason,
        };

        let port = serialport::new(port_name, settings.baud_rate)
            .timeout(settings.read_timeout)
            .open()
            .map_err(|e| port_error(e.to_string()))?;
        port.clear(ClearBuffer::Input)
            .map_err(|e| port_error(format!("failed to reset input buffer: {}", e)))?;

        Ok(Self {
            port_name: port_name.to_string(),
            port: Some(port),
            read_buf: Vec::new(),
        })
    }
}

impl ByteSource for SerialByteSource {
    fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, CaptureError> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| CaptureError::ReadFailed(format!("{} is closed", self.port_name)))?;

        self.read_buf.resize(max_bytes, 0);
        match port.read(&mut self.read_buf[..max_bytes]) {
            Ok(n) => Ok(self.read_buf[..n].to_vec()),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => Ok(Vec::new()),
            Err(e) => Err(CaptureError::ReadFailed(format!("{}: {}", self.port_name, e))),
        }
    }

    fn close(&mut self) -> Result<(), CaptureError> {
        // Dropping the handle closes the port.
        self.port.take();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.port_name
    }
}
