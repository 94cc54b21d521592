//! Streaming decoder for the sensor's marker-framed sample packets.
//!
//! Wire format:
//! ```text
//! ┌────────────────────┬──────────────────┬────────────────────────────┐
//! │ Marker (4B)        │ Length (2B BE)   │ Payload (2·Length bytes)   │
//! │ 00 11 22 33        │ sample count     │ i16 samples, little-endian │
//! └────────────────────┴──────────────────┴────────────────────────────┘
//! ```
//!
//! Bytes are accumulated with [`FrameDecoder::feed`] and complete frames are
//! pulled out with [`FrameDecoder::drain`]. Nothing is decoded until the
//! accumulator grows past the resync threshold, so the decoder always sees at
//! least one whole frame when it has to decide whether the stream is aligned.

use bytes::{Buf, BufMut, BytesMut};

use crate::models::config::FrameLimits;
use crate::models::error::CaptureError;

/// Start-of-frame marker.
pub const START_MARKER: [u8; 4] = [0x00, 0x11, 0x22, 0x33];

/// Marker (4) + payload length (2).
pub const HEADER_SIZE: usize = 6;

/// Wire size of a frame carrying `payload_samples` samples.
pub const fn max_frame_size(payload_samples: u16) -> usize {
    HEADER_SIZE + 2 * payload_samples as usize
}

/// Samples extracted from one frame, still interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    samples: Vec<i16>,
}

impl DecodedBlock {
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Running counters kept by a [`FrameDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    pub frames_decoded: u64,
    pub bytes_dropped: u64,
    pub resyncs: u64,
}

/// Stateful frame extractor owning the raw byte accumulator.
#[derive(Debug)]
pub struct FrameDecoder {
    buf: BytesMut,
    resync_threshold: usize,
    stats: DecoderStats,
    pending_fault: Option<CaptureError>,
}

impl FrameDecoder {
    /// Create a decoder, rejecting limits whose threshold does not exceed the
    /// largest frame.
    pub fn new(limits: FrameLimits) -> Result<Self, CaptureError> {
        limits.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(Self {
            buf: BytesMut::with_capacity(limits.resync_threshold * 2),
            resync_threshold: limits.resync_threshold,
            stats: DecoderStats::default(),
            pending_fault: None,
        })
    }

    /// Append raw bytes. Never decodes.
    pub fn feed(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Extract every complete frame currently available.
    ///
    /// An empty result means more bytes are needed. A framing fault is only
    /// returned from a pass that decoded nothing, so blocks decoded ahead of a
    /// lost marker are never discarded. The fault is held and returned by the
    /// next call, before any newly fed bytes are examined.
    pub fn drain(&mut self) -> Result<Vec<DecodedBlock>, CaptureError> {
        if let Some(fault) = self.pending_fault.take() {
            return Err(fault);
        }

        let mut decoded = Vec::new();

        // The threshold always exceeds HEADER_SIZE, so a full header is present.
        while self.buf.len() > self.resync_threshold {
            if self.buf[..START_MARKER.len()] == START_MARKER {
                let payload_len = u16::from_be_bytes([self.buf[4], self.buf[5]]) as usize;
                let frame_end = HEADER_SIZE + payload_len * 2;
                if self.buf.len() < frame_end {
                    break;
                }

                self.buf.advance(HEADER_SIZE);
                let payload = self.buf.split_to(payload_len * 2);
                let samples = payload
                    .chunks_exact(2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .collect();

                self.stats.frames_decoded += 1;
                decoded.push(DecodedBlock { samples });
                continue;
            }

            match find_marker(&self.buf) {
                Some(offset) => {
                    log::warn!("Dropped {} bytes before start marker", offset);
                    self.buf.advance(offset);
                    self.stats.bytes_dropped += offset as u64;
                    self.stats.resyncs += 1;
                }
                None if decoded.is_empty() => {
                    return Err(CaptureError::FramingFault {
                        buffered: self.buf.len(),
                    });
                }
                None => {
                    self.pending_fault = Some(CaptureError::FramingFault {
                        buffered: self.buf.len(),
                    });
                    break;
                }
            }
        }

        Ok(decoded)
    }

    /// Bytes currently held in the accumulator.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }
}

fn find_marker(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(START_MARKER.len())
        .position(|window| window == START_MARKER)
}

/// Encode `samples` as one frame into `dst`.
pub fn encode_frame(samples: &[i16], dst: &mut BytesMut) -> Result<(), CaptureError> {
    let count = u16::try_from(samples.len()).map_err(|_| {
        CaptureError::ConfigurationFailed(format!(
            "frame payload of {} samples exceeds {}",
            samples.len(),
            u16::MAX
        ))
    })?;
    dst.reserve(max_frame_size(count));
    dst.put_slice(&START_MARKER);
    dst.put_u16(count);
    for &sample in samples {
        dst.put_i16_le(sample);
    }
    Ok(())
}
