use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingMetadata;

/// Path of the JSON sidecar for recording `name` in `directory`.
pub fn metadata_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{}.metadata.json", name))
}

/// Write recording metadata as a JSON sidecar file, replacing any previous one.
pub fn write_metadata(metadata: &RecordingMetadata, directory: &Path) -> Result<PathBuf, CaptureError> {
    let path = metadata_path(directory, &metadata.name);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| CaptureError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(path)
}

/// Read recording metadata back from its JSON sidecar file.
pub fn read_metadata(directory: &Path, name: &str) -> Result<RecordingMetadata, CaptureError> {
    let json = fs::read_to_string(metadata_path(directory, name))
        .map_err(|e| CaptureError::StorageError(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json).map_err(|e| CaptureError::StorageError(format!("failed to parse metadata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::channel::ChannelKind;
    use crate::models::recording_result::{ChannelRecording, SaveResult};

    #[test]
    fn sidecar_survives_write_and_read() {
        let dir = std::env::temp_dir().join("serial_audio_test_metadata");
        fs::create_dir_all(&dir).unwrap();

        let result = SaveResult {
            name: "take1".into(),
            sample_rate: 16000,
            sample_count: 8000,
            duration_secs: 0.5,
            channels: vec![ChannelRecording {
                channel: ChannelKind::Secondary,
                file_path: dir.join("take1_data.wav"),
                sample_count: 8000,
                checksum: "abc".into(),
            }],
        };
        let metadata = RecordingMetadata::from_result(&result);

        let path = write_metadata(&metadata, &dir).unwrap();
        assert_eq!(path, dir.join("take1.metadata.json"));

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"secondary\""));

        let restored = read_metadata(&dir, "take1").unwrap();
        assert_eq!(restored, metadata);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_sidecar_is_a_storage_error() {
        let dir = std::env::temp_dir().join("serial_audio_test_metadata_missing");
        assert!(matches!(
            read_metadata(&dir, "nope"),
            Err(CaptureError::StorageError(_))
        ));
    }
}
