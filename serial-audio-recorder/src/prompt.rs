//! Line-based user input for the recorder.
//!
//! Stdin lines, Ctrl-C and capture failures all arrive on one channel of
//! [`Event`]s, so the foreground can wait on a single receiver whether it is
//! asking for a file name or waiting for a save.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use serial_audio_core::CaptureError;

/// Something the foreground has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One line typed by the user, without its line ending.
    Line(String),
    /// Stop without saving (Ctrl-C or end of input).
    Interrupt,
    /// The capture thread hit a fatal error.
    CaptureFailed,
}

/// What a line typed at the save prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Save the recording and stop.
    Save,
    /// Discard the buffered audio and keep recording.
    Rerecord,
}

impl Command {
    /// `r` re-records; any other line saves.
    pub fn parse(line: &str) -> Self {
        if line.trim().eq_ignore_ascii_case("r") {
            Self::Rerecord
        } else {
            Self::Save
        }
    }
}

/// Print `prompt` without a trailing newline.
pub fn show_prompt(prompt: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()
}

/// Wait for the next typed line.
///
/// Returns `None` when the user interrupts, capture fails, or every sender is
/// gone.
pub fn next_line(inbox: &Receiver<Event>) -> Option<String> {
    match inbox.recv() {
        Ok(Event::Line(line)) => Some(line),
        Ok(Event::Interrupt) | Ok(Event::CaptureFailed) | Err(_) => None,
    }
}

/// Forward each stdin line to `events` from a background thread, ending with
/// [`Event::Interrupt`] at end of input.
pub fn spawn_stdin_reader(events: Sender<Event>) -> Result<(), CaptureError> {
    thread::Builder::new()
        .name("stdin-events".into())
        .spawn(move || {
            let stdin = io::stdin();
            let mut lines = stdin.lock();
            loop {
                let mut line = String::new();
                let event = match lines.read_line(&mut line) {
                    Ok(0) => Event::Interrupt,
                    Ok(_) => Event::Line(line.trim_end_matches(['\r', '\n']).to_string()),
                    Err(e) => {
                        log::error!("Failed to read input: {}", e);
                        Event::Interrupt
                    }
                };
                let last = event == Event::Interrupt;
                if events.send(event).is_err() || last {
                    break;
                }
            }
        })
        .map(|_| ())
        .map_err(|e| CaptureError::Unknown(format!("failed to spawn input thread: {}", e)))
}
