use crate::models::channel::ChannelFrame;
use crate::models::error::CaptureError;

/// Split an interleaved block into its two channels.
///
/// Even indices go to the primary channel, odd indices to the secondary.
/// An odd sample count means the frame was corrupted in transit and is
/// rejected rather than truncated.
pub fn deinterleave(samples: &[i16]) -> Result<ChannelFrame, CaptureError> {
    if samples.len() % 2 != 0 {
        return Err(CaptureError::MalformedPayload(samples.len()));
    }

    let frames = samples.len() / 2;
    let mut primary = Vec::with_capacity(frames);
    let mut secondary = Vec::with_capacity(frames);
    for pair in samples.chunks_exact(2) {
        primary.push(pair[0]);
        secondary.push(pair[1]);
    }

    Ok(ChannelFrame { primary, secondary })
}
