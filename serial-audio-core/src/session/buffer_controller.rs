use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::channel::{ChannelFrame, ChannelKind};
use crate::models::config::RecorderConfiguration;
use crate::models::error::CaptureError;
use crate::models::recording_result::{ChannelRecording, RecordingMetadata, SaveResult};
use crate::storage::metadata;
use crate::traits::channel_store::ChannelStore;
use crate::traits::sample_sink::SampleSink;

/// Two-channel sample buffers persisted as one file per channel.
///
/// Each channel keeps the fragments as they arrived; they are only
/// concatenated when saving.
pub struct DualChannelStore {
    primary: Vec<Vec<i16>>,
    secondary: Vec<Vec<i16>>,
    buffered: usize,
    sink: Arc<dyn SampleSink>,
    sample_rate: u32,
    output_directory: PathBuf,
    primary_suffix: String,
    secondary_suffix: String,
    write_metadata: bool,
}

impl DualChannelStore {
    pub fn new(config: &RecorderConfiguration, sink: Arc<dyn SampleSink>) -> Self {
        Self {
            primary: Vec::new(),
            secondary: Vec::new(),
            buffered: 0,
            sink,
            sample_rate: config.sample_rate,
            output_directory: config.output_directory.clone(),
            primary_suffix: config.primary_suffix.clone(),
            secondary_suffix: config.secondary_suffix.clone(),
            write_metadata: config.write_metadata,
        }
    }

    /// Destination file for one channel of recording `name`.
    pub fn channel_path(&self, name: &str, channel: ChannelKind) -> PathBuf {
        let suffix = match channel {
            ChannelKind::Primary => &self.primary_suffix,
            ChannelKind::Secondary => &self.secondary_suffix,
        };
        self.output_directory.join(format!("{}_{}.wav", name, suffix))
    }

    /// Remove the files of a save that failed part-way, so no channel is left
    /// on disk without its partner.
    fn discard_written(&self, written: &[ChannelRecording]) {
        for recording in written {
            if let Err(e) = self.sink.discard(&recording.file_path) {
                log::warn!("Partial recording left at {}: {}", recording.file_path.display(), e);
            }
        }
    }

    fn fragments(&self, channel: ChannelKind) -> &[Vec<i16>] {
        match channel {
            ChannelKind::Primary => &self.primary,
            ChannelKind::Secondary => &self.secondary,
        }
    }
}

impl ChannelStore for DualChannelStore {
    fn append(&mut self, frame: ChannelFrame) {
        if frame.is_empty() {
            return;
        }
        self.buffered += frame.len();
        self.primary.push(frame.primary);
        self.secondary.push(frame.secondary);
    }

    fn persist(&mut self, name: &str) -> Result<SaveResult, CaptureError> {
        if name.trim().is_empty() {
            return Err(CaptureError::ConfigurationFailed("recording name must not be empty".into()));
        }
        if self.buffered == 0 {
            return Err(CaptureError::EmptyRecording);
        }

        let mut channels = Vec::with_capacity(ChannelKind::ALL.len());
        for channel in ChannelKind::ALL {
            let samples = self.fragments(channel).concat();
            let file_path = self.channel_path(name, channel);
            let checksum = match self.sink.write_samples(&file_path, &samples, self.sample_rate) {
                Ok(checksum) => checksum,
                Err(e) => {
                    self.discard_written(&channels);
                    return Err(e);
                }
            };
            channels.push(ChannelRecording {
                channel,
                file_path,
                sample_count: samples.len(),
                checksum,
            });
        }

        let sample_count = self.buffered;
        let duration_secs = sample_count as f64 / self.sample_rate as f64;
        let result = SaveResult {
            name: name.to_string(),
            sample_rate: self.sample_rate,
            sample_count,
            duration_secs,
            channels,
        };

        if self.write_metadata {
            if let Err(e) = metadata::write_metadata(&RecordingMetadata::from_result(&result), &self.output_directory) {
                log::warn!("Recording {} saved without metadata: {}", name, e);
            }
        }

        log::info!("{} samples -> {:.2} seconds saved", sample_count, duration_secs);
        self.reset();
        Ok(result)
    }

    fn reset(&mut self) {
        self.primary.clear();
        self.secondary.clear();
        self.buffered = 0;
    }

    fn sample_count(&self) -> usize {
        self.buffered
    }
}

/// Serializes every access to a [`ChannelStore`] behind one lock.
///
/// The capture loop appends, the foreground saves or clears; a save's
/// concatenate, write and reset steps run under the same guard so an append
/// can never land between them.
pub struct BufferController<S: ChannelStore> {
    store: Mutex<S>,
}

impl<S: ChannelStore> BufferController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Append a batch of frames under a single lock acquisition.
    pub fn append(&self, frames: Vec<ChannelFrame>) {
        if frames.is_empty() {
            return;
        }
        let mut store = self.store.lock();
        for frame in frames {
            store.append(frame);
        }
    }

    /// Persist and reset the buffers.
    pub fn save(&self, name: &str) -> Result<SaveResult, CaptureError> {
        self.store.lock().persist(name)
    }

    /// Discard buffered samples. A no-op on empty buffers.
    pub fn clear(&self) {
        self.store.lock().reset();
    }

    pub fn sample_count(&self) -> usize {
        self.store.lock().sample_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySink;
    use crate::storage::wav_writer::WavFileSink;
    use approx::assert_relative_eq;
    use std::sync::Barrier;
    use std::thread;

    fn frame(primary: &[i16], secondary: &[i16]) -> ChannelFrame {
        ChannelFrame {
            primary: primary.to_vec(),
            secondary: secondary.to_vec(),
        }
    }

    fn config_in(dir: &str) -> RecorderConfiguration {
        RecorderConfiguration {
            output_directory: PathBuf::from(dir),
            ..Default::default()
        }
    }

    #[test]
    fn save_concatenates_fragments_and_resets() {
        let sink = MemorySink::new();
        let controller = BufferController::new(DualChannelStore::new(&config_in("out"), sink.clone()));

        controller.append(vec![frame(&[1, 2], &[-1, -2])]);
        controller.append(vec![frame(&[3], &[-3]), frame(&[4], &[-4])]);
        assert_eq!(controller.sample_count(), 4);

        let result = controller.save("take").unwrap();
        assert_eq!(result.sample_count, 4);
        assert_eq!(result.channels.len(), 2);
        assert_eq!(sink.file(&PathBuf::from("out/take_gt.wav")), Some(vec![1, 2, 3, 4]));
        assert_eq!(sink.file(&PathBuf::from("out/take_data.wav")), Some(vec![-1, -2, -3, -4]));
        assert_eq!(controller.sample_count(), 0);

        let secondary = result.channel(ChannelKind::Secondary).unwrap();
        assert_eq!(secondary.checksum, "mem:4");
    }

    #[test]
    fn empty_save_is_reported_and_writes_nothing() {
        let sink = MemorySink::new();
        let controller = BufferController::new(DualChannelStore::new(&config_in("out"), sink.clone()));

        assert_eq!(controller.save("x"), Err(CaptureError::EmptyRecording));
        assert_eq!(sink.file_count(), 0);

        controller.append(vec![frame(&[], &[])]);
        assert_eq!(controller.save("x"), Err(CaptureError::EmptyRecording));
    }

    #[test]
    fn blank_name_is_rejected() {
        let controller = BufferController::new(DualChannelStore::new(&config_in("out"), MemorySink::new()));
        controller.append(vec![frame(&[1], &[2])]);
        assert!(matches!(
            controller.save("  "),
            Err(CaptureError::ConfigurationFailed(_))
        ));
        assert_eq!(controller.sample_count(), 1);
    }

    #[test]
    fn clear_discards_and_is_idempotent() {
        let sink = MemorySink::new();
        let controller = BufferController::new(DualChannelStore::new(&config_in("out"), sink.clone()));

        controller.clear();
        controller.append(vec![frame(&[1, 2], &[3, 4])]);
        controller.clear();
        controller.clear();

        assert_eq!(controller.sample_count(), 0);
        assert_eq!(controller.save("x"), Err(CaptureError::EmptyRecording));
        assert_eq!(sink.file_count(), 0);
    }

    #[test]
    fn failed_write_keeps_samples() {
        let controller = BufferController::new(DualChannelStore::new(&config_in("out"), MemorySink::failing()));
        controller.append(vec![frame(&[1, 2], &[3, 4])]);

        assert!(matches!(controller.save("x"), Err(CaptureError::StorageError(_))));
        assert_eq!(controller.sample_count(), 2);
    }

    #[test]
    fn failed_second_channel_removes_the_first() {
        let sink = MemorySink::failing_after(1);
        let controller = BufferController::new(DualChannelStore::new(&config_in("out"), sink.clone()));
        controller.append(vec![frame(&[1, 2], &[3, 4])]);

        assert!(matches!(controller.save("x"), Err(CaptureError::StorageError(_))));
        assert_eq!(sink.file_count(), 0);
        assert_eq!(controller.sample_count(), 2);
    }

    #[test]
    fn failed_second_wav_leaves_no_orphan_on_disk() {
        let dir = std::env::temp_dir().join("serial_audio_test_partial_save");
        std::fs::remove_dir_all(&dir).ok();
        // A directory squatting on the secondary path makes its write fail.
        std::fs::create_dir_all(dir.join("x_data.wav")).unwrap();
        let config = RecorderConfiguration {
            output_directory: dir.clone(),
            ..Default::default()
        };
        let controller = BufferController::new(DualChannelStore::new(&config, Arc::new(WavFileSink::new())));
        controller.append(vec![frame(&[1, 2], &[3, 4])]);

        assert!(matches!(controller.save("x"), Err(CaptureError::StorageError(_))));
        assert!(!dir.join("x_gt.wav").exists());
        assert_eq!(controller.sample_count(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn duration_follows_sample_rate() {
        let controller = BufferController::new(DualChannelStore::new(&config_in("out"), MemorySink::new()));
        controller.append(vec![frame(&vec![0; 8000], &vec![0; 8000])]);

        let result = controller.save("half").unwrap();
        assert_relative_eq!(result.duration_secs, 0.5);
    }

    #[test]
    fn writes_wav_files_and_metadata_sidecar() {
        let dir = std::env::temp_dir().join("serial_audio_test_controller");
        std::fs::remove_dir_all(&dir).ok();
        let config = RecorderConfiguration {
            output_directory: dir.clone(),
            write_metadata: true,
            ..Default::default()
        };
        let controller = BufferController::new(DualChannelStore::new(&config, Arc::new(WavFileSink::new())));
        controller.append(vec![frame(&[1, 2, 3], &[4, 5, 6])]);

        let result = controller.save("session").unwrap();

        for recording in &result.channels {
            let data = std::fs::read(&recording.file_path).unwrap();
            assert_eq!(data.len(), 44 + 6);
        }
        let sidecar = metadata::read_metadata(&dir, "session").unwrap();
        assert_eq!(sidecar.sample_count, 3);
        assert_eq!(sidecar.channels.len(), 2);
        assert_eq!(sidecar.channels[0].checksum, result.channels[0].checksum);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn concurrent_appends_and_save_lose_nothing() {
        const WRITERS: usize = 4;
        const FRAMES_PER_WRITER: usize = 500;

        let sink = MemorySink::new();
        let controller = Arc::new(BufferController::new(DualChannelStore::new(
            &config_in("concurrent"),
            sink.clone(),
        )));
        let barrier = Arc::new(Barrier::new(WRITERS + 1));

        let writers: Vec<_> = (0..WRITERS)
            .map(|w| {
                let controller = Arc::clone(&controller);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..FRAMES_PER_WRITER {
                        let value = (w * FRAMES_PER_WRITER + i) as i16;
                        controller.append(vec![frame(&[value, value], &[-value, -value])]);
                    }
                })
            })
            .collect();

        barrier.wait();
        let saved = loop {
            match controller.save("mid") {
                Ok(result) => break result,
                Err(CaptureError::EmptyRecording) => thread::yield_now(),
                Err(e) => panic!("unexpected save error: {}", e),
            }
        };
        for writer in writers {
            writer.join().unwrap();
        }

        let primary = sink.file(&PathBuf::from("concurrent/mid_gt.wav")).unwrap();
        let secondary = sink.file(&PathBuf::from("concurrent/mid_data.wav")).unwrap();
        assert_eq!(primary.len(), saved.sample_count);
        assert_eq!(secondary.len(), saved.sample_count);
        assert!(primary.iter().zip(&secondary).all(|(p, s)| *s == -*p));

        let total = WRITERS * FRAMES_PER_WRITER * 2;
        let remaining = controller.sample_count();
        assert_eq!(saved.sample_count + remaining, total);

        if remaining > 0 {
            let rest = controller.save("rest").unwrap();
            assert_eq!(rest.sample_count, remaining);
        }
        assert_eq!(controller.sample_count(), 0);
    }
}
