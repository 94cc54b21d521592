use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::models::channel::CaptureSummary;
use crate::models::config::RecorderConfiguration;
use crate::models::error::CaptureError;
use crate::models::recording_result::SaveResult;
use crate::models::state::RecorderState;
use crate::processing::demux;
use crate::processing::frame_decoder::FrameDecoder;
use crate::session::buffer_controller::{BufferController, DualChannelStore};
use crate::traits::byte_source::ByteSource;
use crate::traits::channel_store::ChannelStore;
use crate::traits::recorder_delegate::RecorderDelegate;
use crate::traits::sample_sink::SampleSink;

type CaptureOutcome = Result<CaptureSummary, CaptureError>;

/// Background recorder for a framed two-channel serial stream.
///
/// Owns the capture thread and exposes save/clear/stop to the foreground:
/// ```text
/// [ByteSource] → [FrameDecoder] → [deinterleave] → [BufferController] → (save) → [SampleSink]
///  capture thread ─────────────────────────────────┘        ↑
///                                              foreground save / clear
/// ```
pub struct SerialRecorder<S: ChannelStore + 'static = DualChannelStore> {
    controller: Arc<BufferController<S>>,
    state: Arc<Mutex<RecorderState>>,
    running: Arc<AtomicBool>,
    delegate: Option<Arc<dyn RecorderDelegate>>,
    capture_handle: Mutex<Option<thread::JoinHandle<CaptureOutcome>>>,
    outcome: Mutex<Option<CaptureOutcome>>,
}

impl SerialRecorder<DualChannelStore> {
    /// Validate `config`, then start capturing from `source` on a new thread.
    ///
    /// Saved channels are written through `sink`.
    pub fn start<B: ByteSource + 'static>(
        source: B,
        config: RecorderConfiguration,
        sink: Arc<dyn SampleSink>,
        delegate: Option<Arc<dyn RecorderDelegate>>,
    ) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        let store = DualChannelStore::new(&config, sink);
        Self::start_with_store(source, store, &config, delegate)
    }
}

impl<S: ChannelStore + 'static> SerialRecorder<S> {
    /// Start capturing into a caller-provided store.
    pub fn start_with_store<B: ByteSource + 'static>(
        source: B,
        store: S,
        config: &RecorderConfiguration,
        delegate: Option<Arc<dyn RecorderDelegate>>,
    ) -> Result<Self, CaptureError> {
        let source = SourceGuard::new(source);
        let decoder = FrameDecoder::new(config.frame_limits)?;

        let controller = Arc::new(BufferController::new(store));
        let state = Arc::new(Mutex::new(RecorderState::Running));
        let running = Arc::new(AtomicBool::new(true));

        let capture = CaptureLoop {
            source,
            decoder,
            controller: Arc::clone(&controller),
            state: Arc::clone(&state),
            running: Arc::clone(&running),
            delegate: delegate.clone(),
            chunk_size: config.read_chunk_size,
            summary: CaptureSummary::default(),
        };

        if let Some(ref d) = delegate {
            d.on_state_changed(RecorderState::Running);
        }

        // A failed spawn drops the closure, and with it the guard that
        // releases the source.
        let handle = thread::Builder::new()
            .name("serial-capture".into())
            .spawn(move || capture.run())
            .map_err(|e| CaptureError::Unknown(format!("failed to spawn capture thread: {}", e)))?;

        Ok(Self {
            controller,
            state,
            running,
            delegate,
            capture_handle: Mutex::new(Some(handle)),
            outcome: Mutex::new(None),
        })
    }

    /// Persist everything captured so far under `name`, then empty the buffers.
    pub fn save(&self, name: &str) -> Result<SaveResult, CaptureError> {
        let result = self.controller.save(name)?;
        if let Some(ref d) = self.delegate {
            d.on_saved(&result);
        }
        Ok(result)
    }

    /// Discard everything captured so far. Capture continues.
    pub fn clear(&self) {
        self.controller.clear();
    }

    /// Samples currently buffered per channel.
    pub fn buffered_samples(&self) -> usize {
        self.controller.sample_count()
    }

    pub fn state(&self) -> RecorderState {
        *self.state.lock()
    }

    /// Ask the capture thread to stop after its current read. Idempotent.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            log::debug!("Stop requested");
        }
    }

    /// Stop and wait for the capture thread to release the byte source.
    ///
    /// Returns the session counters, or the error that ended the session.
    /// Later calls return the same outcome.
    pub fn join(&self) -> Result<CaptureSummary, CaptureError> {
        self.stop();

        if let Some(handle) = self.capture_handle.lock().take() {
            let outcome = handle
                .join()
                .unwrap_or_else(|_| Err(CaptureError::Unknown("capture thread panicked".into())));
            *self.outcome.lock() = Some(outcome);
        }

        self.outcome.lock().clone().unwrap_or(Ok(CaptureSummary::default()))
    }
}

impl<S: ChannelStore + 'static> Drop for SerialRecorder<S> {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            log::debug!("Capture session ended with error: {}", e);
        }
    }
}

/// Closes the wrapped source exactly once, on request or on drop.
struct SourceGuard<B: ByteSource> {
    source: B,
    released: bool,
}

impl<B: ByteSource> SourceGuard<B> {
    fn new(source: B) -> Self {
        Self { source, released: false }
    }

    fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, CaptureError> {
        self.source.read_chunk(max_bytes)
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        log::info!("Closing {}...", self.source.name());
        self.source.close()
    }
}

impl<B: ByteSource> Drop for SourceGuard<B> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::error!("Failed to close {}: {}", self.source.name(), e);
        }
    }
}

/// State owned by the capture thread.
struct CaptureLoop<B: ByteSource, S: ChannelStore> {
    source: SourceGuard<B>,
    decoder: FrameDecoder,
    controller: Arc<BufferController<S>>,
    state: Arc<Mutex<RecorderState>>,
    running: Arc<AtomicBool>,
    delegate: Option<Arc<dyn RecorderDelegate>>,
    chunk_size: usize,
    summary: CaptureSummary,
}

impl<B: ByteSource, S: ChannelStore> CaptureLoop<B, S> {
    fn run(mut self) -> CaptureOutcome {
        let pumped = self.pump();
        if let Err(ref e) = pumped {
            log::error!("Capture stopped: {}", e);
            self.report(e);
        }
        self.running.store(false, Ordering::SeqCst);
        self.set_state(RecorderState::Draining);

        let released = self.source.release();
        if let Err(ref e) = released {
            log::error!("Failed to close {}: {}", self.source.source.name(), e);
            self.report(e);
        }
        self.set_state(RecorderState::Closed);

        let stats = self.decoder.stats();
        self.summary.frames_decoded = stats.frames_decoded;
        self.summary.bytes_dropped = stats.bytes_dropped;
        self.summary.resyncs = stats.resyncs;
        log::info!(
            "Capture finished: {} bytes read, {} frames decoded, {} malformed, {} bytes dropped in {} resyncs",
            self.summary.bytes_read,
            self.summary.frames_decoded,
            self.summary.frames_malformed,
            self.summary.bytes_dropped,
            self.summary.resyncs
        );

        pumped.and(released).map(|_| self.summary)
    }

    /// Read, decode and buffer until stopped or a fatal error occurs.
    fn pump(&mut self) -> Result<(), CaptureError> {
        while self.running.load(Ordering::SeqCst) {
            let chunk = self.source.read_chunk(self.chunk_size)?;
            if !chunk.is_empty() {
                self.summary.bytes_read += chunk.len() as u64;
                self.decoder.feed(&chunk);
            }

            // Drained even on an idle read so a held framing fault surfaces.
            let blocks = self.decoder.drain()?;
            if blocks.is_empty() {
                continue;
            }

            let mut frames = Vec::with_capacity(blocks.len());
            for block in &blocks {
                match demux::deinterleave(block.samples()) {
                    Ok(frame) => frames.push(frame),
                    Err(e) => {
                        log::warn!("Dropping frame: {}", e);
                        self.summary.frames_malformed += 1;
                        self.report(&e);
                    }
                }
            }
            self.controller.append(frames);
        }
        Ok(())
    }

    fn set_state(&self, new_state: RecorderState) {
        *self.state.lock() = new_state;
        if let Some(ref d) = self.delegate {
            d.on_state_changed(new_state);
        }
    }

    fn report(&self, error: &CaptureError) {
        if let Some(ref d) = self.delegate {
            d.on_error(error);
        }
    }
}
