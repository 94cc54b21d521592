use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::models::error::CaptureError;
use crate::processing::wav_format;
use crate::traits::sample_sink::SampleSink;

/// Writes each channel as a mono 16-bit PCM WAV file.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header]
/// [raw 16-bit PCM data...]
/// ```
///
/// An existing file at the destination is removed first. The returned
/// checksum is the SHA-256 hex digest of the complete file.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavFileSink;

impl WavFileSink {
    pub fn new() -> Self {
        Self
    }
}

impl SampleSink for WavFileSink {
    fn write_samples(&self, path: &Path, samples: &[i16], sample_rate: u32) -> Result<String, CaptureError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        if path.exists() {
            fs::remove_file(path).map_err(|e| {
                CaptureError::StorageError(format!("failed to remove {}: {}", path.display(), e))
            })?;
        }

        let pcm = wav_format::encode_pcm16(samples);
        let data_size = u32::try_from(pcm.len())
            .ok()
            .filter(|size| size.checked_add(36).is_some())
            .ok_or_else(|| CaptureError::StorageError(format!("{} samples exceed the WAV size limit", samples.len())))?;
        let header = wav_format::generate_wav_header(sample_rate, wav_format::PCM_BIT_DEPTH, 1, data_size);

        let mut hasher = Sha256::new();
        hasher.update(header);
        hasher.update(&pcm);

        let file = File::create(path).map_err(|e| CaptureError::StorageError(format!("failed to create file: {}", e)))?;
        let write_failed = |e: std::io::Error| CaptureError::StorageError(format!("write failed: {}", e));
        let mut writer = BufWriter::new(file);
        writer.write_all(&header).map_err(write_failed)?;
        writer.write_all(&pcm).map_err(write_failed)?;
        writer.flush().map_err(write_failed)?;

        Ok(hex_encode(&hasher.finalize()))
    }

    fn discard(&self, path: &Path) -> Result<(), CaptureError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CaptureError::StorageError(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
