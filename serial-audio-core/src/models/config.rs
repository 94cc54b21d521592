use std::path::PathBuf;

use crate::processing::frame_decoder::max_frame_size;

/// Default sample rate of the sensor stream in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default number of bytes requested from the byte source per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1000;

/// Framing limits shared by the decoder and the capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    /// Largest payload length (in samples) the device is deployed to send.
    pub max_payload_samples: u16,

    /// Minimum accumulator size before the decoder starts processing.
    ///
    /// Must be strictly greater than the largest possible frame, otherwise a
    /// still-growing valid frame could be mistaken for a lost marker.
    pub resync_threshold: usize,
}

impl FrameLimits {
    pub fn validate(&self) -> Result<(), String> {
        let largest = max_frame_size(self.max_payload_samples);
        if self.resync_threshold <= largest {
            return Err(format!(
                "resync threshold {} must exceed the largest frame size {} ({} samples)",
                self.resync_threshold, largest, self.max_payload_samples
            ));
        }
        Ok(())
    }
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_payload_samples: 2048,
            resync_threshold: 5000,
        }
    }
}

/// Configuration for a recording session.
#[derive(Debug, Clone)]
pub struct RecorderConfiguration {
    /// Sample rate written to saved files in Hz (default: 16000).
    pub sample_rate: u32,

    /// Bytes requested from the byte source on each read (default: 1000).
    pub read_chunk_size: usize,

    pub frame_limits: FrameLimits,

    /// Directory where recordings are written.
    pub output_directory: PathBuf,

    /// File name suffix for the primary (even-index) channel.
    pub primary_suffix: String,

    /// File name suffix for the secondary (odd-index) channel.
    pub secondary_suffix: String,

    /// Write a `<name>.metadata.json` sidecar on every save.
    pub write_metadata: bool,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.read_chunk_size == 0 {
            return Err("read chunk size must be positive".into());
        }
        if self.primary_suffix.is_empty() || self.secondary_suffix.is_empty() {
            return Err("channel suffixes must not be empty".into());
        }
        if self.primary_suffix == self.secondary_suffix {
            return Err(format!(
                "channel suffixes must differ (both are {:?})",
                self.primary_suffix
            ));
        }
        self.frame_limits.validate()
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            frame_limits: FrameLimits::default(),
            output_directory: PathBuf::from("."),
            primary_suffix: "gt".into(),
            secondary_suffix: "data".into(),
            write_metadata: false,
        }
    }
}
