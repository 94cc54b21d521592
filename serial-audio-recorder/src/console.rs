use std::sync::mpsc::Sender;

use serial_audio_core::{CaptureError, RecorderDelegate, RecorderState, SaveResult};

use crate::prompt::Event;

/// Reports recorder events on the terminal and wakes the control loop when
/// capture dies.
pub struct ConsoleDelegate {
    events: Sender<Event>,
}

impl ConsoleDelegate {
    pub fn new(events: Sender<Event>) -> Self {
        Self { events }
    }
}

impl RecorderDelegate for ConsoleDelegate {
    fn on_state_changed(&self, state: RecorderState) {
        log::debug!("Recorder {}", state.as_str());
    }

    fn on_error(&self, error: &CaptureError) {
        if error.is_fatal() {
            eprintln!("Capture failed: {error}");
            let _ = self.events.send(Event::CaptureFailed);
        }
    }

    fn on_saved(&self, result: &SaveResult) {
        println!(
            "[BCM] {} samples -> {:.2} seconds saved",
            result.sample_count, result.duration_secs
        );
        for channel in &result.channels {
            println!("  {}", channel.file_path.display());
        }
    }
}
