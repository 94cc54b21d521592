use crate::models::channel::ChannelFrame;
use crate::models::error::CaptureError;
use crate::models::recording_result::SaveResult;

/// Capability set of the per-channel sample buffers.
///
/// Implementations are not synchronized themselves; `BufferController`
/// serializes every call behind a single lock.
pub trait ChannelStore: Send {
    /// Add one demultiplexed frame to the buffers.
    fn append(&mut self, frame: ChannelFrame);

    /// Persist the buffered samples under `name`, then empty the buffers.
    ///
    /// Fails with `CaptureError::EmptyRecording` when nothing is buffered.
    fn persist(&mut self, name: &str) -> Result<SaveResult, CaptureError>;

    /// Discard everything buffered.
    fn reset(&mut self);

    /// Samples buffered per channel.
    fn sample_count(&self) -> usize;
}
