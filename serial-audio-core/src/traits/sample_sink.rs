use std::path::Path;

use crate::models::error::CaptureError;

/// Durable storage for one channel's samples.
pub trait SampleSink: Send + Sync {
    /// Write `samples` at `sample_rate` to `path`, replacing any existing file.
    ///
    /// Returns a checksum of what was written.
    fn write_samples(&self, path: &Path, samples: &[i16], sample_rate: u32) -> Result<String, CaptureError>;

    /// Remove a file written earlier. A missing file is not an error.
    fn discard(&self, path: &Path) -> Result<(), CaptureError>;
}
