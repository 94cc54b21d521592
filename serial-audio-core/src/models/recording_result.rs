use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::channel::ChannelKind;

/// One persisted channel of a saved recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecording {
    pub channel: ChannelKind,
    pub file_path: PathBuf,
    pub sample_count: usize,
    pub checksum: String,
}

/// Result returned by a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveResult {
    pub name: String,
    pub sample_rate: u32,
    /// Samples per channel.
    pub sample_count: usize,
    pub duration_secs: f64,
    pub channels: Vec<ChannelRecording>,
}

impl SaveResult {
    pub fn channel(&self, channel: ChannelKind) -> Option<&ChannelRecording> {
        self.channels.iter().find(|c| c.channel == channel)
    }
}

/// Sidecar entry for one channel file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFileMetadata {
    pub channel: ChannelKind,
    pub file_path: String,
    pub checksum: String,
}

/// Metadata written alongside a saved recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub duration_secs: f64,
    pub channels: Vec<ChannelFileMetadata>,
}

impl RecordingMetadata {
    pub fn from_result(result: &SaveResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: result.name.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sample_rate: result.sample_rate,
            sample_count: result.sample_count,
            duration_secs: result.duration_secs,
            channels: result
                .channels
                .iter()
                .map(|c| ChannelFileMetadata {
                    channel: c.channel,
                    file_path: c.file_path.to_string_lossy().to_string(),
                    checksum: c.checksum.clone(),
                })
                .collect(),
        }
    }
}
