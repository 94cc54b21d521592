use crate::models::error::CaptureError;

/// A blocking source of raw bytes, typically a serial port.
///
/// Implemented by:
/// - `SerialByteSource` (serial-audio-port)
/// - in-memory sources in tests
pub trait ByteSource: Send {
    /// Read up to `max_bytes` bytes.
    ///
    /// Blocks until at least one byte is available or the source's read
    /// timeout elapses. An empty chunk means the timeout elapsed; the capture
    /// loop uses it to observe stop requests.
    fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, CaptureError>;

    /// Release the underlying device. Called exactly once by the capture loop.
    fn close(&mut self) -> Result<(), CaptureError>;

    /// Human-readable name for logging (e.g. the port path).
    fn name(&self) -> &str;
}
