use serde::{Deserialize, Serialize};

/// One of the two sample streams carried interleaved in every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Even-indexed samples (reference microphone).
    Primary,
    /// Odd-indexed samples (sensor channel).
    Secondary,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 2] = [ChannelKind::Primary, ChannelKind::Secondary];
}

/// The two channel fragments split out of one decoded block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFrame {
    pub primary: Vec<i16>,
    pub secondary: Vec<i16>,
}

impl ChannelFrame {
    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

/// Counters for one capture session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    pub bytes_read: u64,
    pub frames_decoded: u64,
    pub frames_malformed: u64,
    pub bytes_dropped: u64,
    pub resyncs: u64,
}
