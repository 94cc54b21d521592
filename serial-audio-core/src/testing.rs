//! In-memory collaborators shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::error::CaptureError;
use crate::traits::byte_source::ByteSource;
use crate::traits::sample_sink::SampleSink;

/// Sink that keeps written samples in memory, keyed by path.
#[derive(Default)]
pub struct MemorySink {
    files: Mutex<HashMap<PathBuf, Vec<i16>>>,
    writes_left: Mutex<Option<usize>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Self::failing_after(0)
    }

    /// Accept `writes` writes, then fail every later one.
    pub fn failing_after(writes: usize) -> Arc<Self> {
        Arc::new(Self {
            writes_left: Mutex::new(Some(writes)),
            ..Default::default()
        })
    }

    pub fn file(&self, path: &Path) -> Option<Vec<i16>> {
        self.files.lock().get(path).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }
}

impl SampleSink for MemorySink {
    fn write_samples(&self, path: &Path, samples: &[i16], _sample_rate: u32) -> Result<String, CaptureError> {
        if let Some(left) = self.writes_left.lock().as_mut() {
            if *left == 0 {
                return Err(CaptureError::StorageError("disk full".into()));
            }
            *left -= 1;
        }
        self.files.lock().insert(path.to_path_buf(), samples.to_vec());
        Ok(format!("mem:{}", samples.len()))
    }

    fn discard(&self, path: &Path) -> Result<(), CaptureError> {
        self.files.lock().remove(path);
        Ok(())
    }
}

/// Byte source replaying a fixed list of chunks, then timing out forever.
pub struct ScriptedSource {
    chunks: VecDeque<Result<Vec<u8>, CaptureError>>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self::with_results(chunks.into_iter().map(Ok).collect())
    }

    pub fn with_results(chunks: Vec<Result<Vec<u8>, CaptureError>>) -> Self {
        Self {
            chunks: chunks.into(),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter incremented on every `close`.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl ByteSource for ScriptedSource {
    fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, CaptureError> {
        match self.chunks.pop_front() {
            Some(Ok(mut chunk)) => {
                if chunk.len() > max_bytes {
                    let rest = chunk.split_off(max_bytes);
                    self.chunks.push_front(Ok(rest));
                }
                Ok(chunk)
            }
            Some(Err(e)) => Err(e),
            None => {
                thread::sleep(Duration::from_millis(1));
                Ok(Vec::new())
            }
        }
    }

    fn close(&mut self) -> Result<(), CaptureError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Poll `condition` until it holds or two seconds pass.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}
