mod console;
mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use clap::Parser;

use serial_audio_core::{ByteSource, CaptureError, DeviceDiscovery, RecorderConfiguration, SerialRecorder, WavFileSink};
use serial_audio_port::{SerialByteSource, SerialSettings, UsbDeviceMatcher};

use crate::console::ConsoleDelegate;
use crate::prompt::{next_line, show_prompt, spawn_stdin_reader, Command, Event};

#[derive(Parser, Debug)]
#[command(name = "serial-audio-recorder", version, about = "Record two-channel audio from a serial sensor")]
struct Cli {
    /// Serial port to open instead of searching for the sensor.
    #[arg(long, value_name = "PATH")]
    port: Option<String>,

    /// Base file name; prompted for when omitted.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Directory for saved recordings.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Serial line speed.
    #[arg(long, value_name = "BAUD", default_value_t = 115_200)]
    baud: u32,

    /// Bytes requested from the port per read.
    #[arg(long, value_name = "BYTES", default_value_t = serial_audio_core::models::config::DEFAULT_READ_CHUNK_SIZE)]
    chunk_size: usize,

    /// Write a JSON metadata sidecar next to each recording.
    #[arg(long)]
    metadata: bool,
}

impl Cli {
    fn recorder_configuration(&self) -> RecorderConfiguration {
        RecorderConfiguration {
            read_chunk_size: self.chunk_size,
            output_directory: self.output_dir.clone(),
            write_metadata: self.metadata,
            ..Default::default()
        }
    }

    fn serial_settings(&self) -> SerialSettings {
        SerialSettings {
            baud_rate: self.baud,
            ..Default::default()
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CaptureError> {
    let (events, inbox) = mpsc::channel();
    let interrupt = events.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt.send(Event::Interrupt);
    })
    .map_err(|e| CaptureError::Unknown(format!("signal handler setup failed: {}", e)))?;

    let port = match &cli.port {
        Some(port) => port.clone(),
        None => UsbDeviceMatcher::default().find_device()?,
    };
    let source = SerialByteSource::open(&port, &cli.serial_settings())?;
    spawn_stdin_reader(events.clone())?;

    let name = match &cli.name {
        Some(name) => Some(name.clone()),
        None => {
            show_prompt("Enter filename: ")
                .map_err(|e| CaptureError::Unknown(format!("failed to write prompt: {}", e)))?;
            next_line(&inbox)
        }
    };
    let Some(name) = name else {
        release(source);
        println!("Aborted before recording");
        return Ok(());
    };
    if name.trim().is_empty() {
        release(source);
        return Err(CaptureError::ConfigurationFailed("a file name is required".into()));
    }

    let delegate = Arc::new(ConsoleDelegate::new(events));
    let recorder = SerialRecorder::start(
        source,
        cli.recorder_configuration(),
        Arc::new(WavFileSink::new()),
        Some(delegate),
    )?;

    let end = control_loop(&recorder, &name, &inbox);
    log::debug!("Session ended: {:?}", end);

    recorder.stop();
    recorder.join().map(|_| ())
}

/// Close a port that never reached the recorder.
fn release(mut source: SerialByteSource) {
    log::info!("Closing {}...", source.name());
    if let Err(e) = source.close() {
        log::error!("Failed to close {}: {}", source.name(), e);
    }
}

/// How the interactive session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Saved,
    Interrupted,
    CaptureFailed,
}

/// Dispatch user input until the session should end.
fn control_loop(recorder: &SerialRecorder, name: &str, inbox: &Receiver<Event>) -> SessionEnd {
    loop {
        println!("Enter to save recording, r to re-record, ctrl+c to stop");
        let event = inbox.recv().unwrap_or(Event::Interrupt);
        match event {
            Event::Line(line) => match Command::parse(&line) {
                Command::Rerecord => {
                    recorder.clear();
                    log::info!("Buffers cleared, recording again");
                }
                Command::Save => match recorder.save(name) {
                    Ok(_) => return SessionEnd::Saved,
                    Err(CaptureError::EmptyRecording) => {
                        eprintln!("Nothing recorded yet, wait for audio before saving");
                    }
                    Err(e) => {
                        eprintln!("Save failed: {e}");
                    }
                },
            },
            Event::Interrupt => return SessionEnd::Interrupted,
            Event::CaptureFailed => return SessionEnd::CaptureFailed,
        }
    }
}
