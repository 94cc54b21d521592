//! # serial-audio-port
//!
//! Serial port backend for serial-audio.
//!
//! Provides:
//! - `UsbDeviceMatcher`: finds the sensor among the attached serial ports
//! - `SerialByteSource`: blocking byte source over an open serial port
//!
//! ## Usage
//! ```ignore
//! use serial_audio_core::{DeviceDiscovery, RecorderConfiguration, SerialRecorder, WavFileSink};
//! use serial_audio_port::{SerialByteSource, SerialSettings, UsbDeviceMatcher};
//!
//! let port = UsbDeviceMatcher::default().find_device()?;
//! let source = SerialByteSource::open(&port, &SerialSettings::default())?;
//! let recorder = SerialRecorder::start(source, RecorderConfiguration::default(), Arc::new(WavFileSink::new()), None)?;
//! ```

pub mod device_matcher;
pub mod serial_source;

pub use device_matcher::{MatchRule, PortDescription, UsbDeviceMatcher};
pub use serial_source::{SerialByteSource, SerialSettings};
