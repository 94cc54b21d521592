//! # serial-audio-core
//!
//! Platform-agnostic core for recording two-channel audio streamed over a
//! serial link as marker-framed packets.
//!
//! Provides frame decoding, channel demultiplexing, lock-protected sample
//! buffers, and WAV output. Device backends implement `ByteSource` and
//! `DeviceDiscovery` and plug into the generic `SerialRecorder`.
//!
//! ## Architecture
//!
//! ```text
//! serial-audio-core (this crate)
//! ├── traits/       ← ByteSource, DeviceDiscovery, SampleSink, ChannelStore, RecorderDelegate
//! ├── models/       ← CaptureError, RecorderConfiguration, RecorderState, ChannelFrame, SaveResult
//! ├── processing/   ← FrameDecoder, deinterleave, WAV header generation
//! ├── session/      ← BufferController, SerialRecorder (capture thread)
//! └── storage/      ← WavFileSink, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use models::channel::{CaptureSummary, ChannelFrame, ChannelKind};
pub use models::config::{FrameLimits, RecorderConfiguration};
pub use models::error::CaptureError;
pub use models::recording_result::{ChannelRecording, RecordingMetadata, SaveResult};
pub use models::state::RecorderState;
pub use processing::frame_decoder::{DecodedBlock, FrameDecoder};
pub use session::buffer_controller::{BufferController, DualChannelStore};
pub use session::recorder::SerialRecorder;
pub use storage::wav_writer::WavFileSink;
pub use traits::byte_source::ByteSource;
pub use traits::channel_store::ChannelStore;
pub use traits::device_discovery::DeviceDiscovery;
pub use traits::recorder_delegate::RecorderDelegate;
pub use traits::sample_sink::SampleSink;
