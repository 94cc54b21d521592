use thiserror::Error;

/// Errors that can occur while capturing, decoding or persisting audio.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to open port {port}: {reason}")]
    PortOpenFailed { port: String, reason: String },

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    /// The accumulator grew past the resync threshold without a start marker.
    /// Fatal for the session.
    #[error("framing fault: no start marker in {buffered} buffered bytes")]
    FramingFault { buffered: usize },

    /// A decoded block whose sample count cannot be split into two channels.
    #[error("malformed payload: odd sample count {0}")]
    MalformedPayload(usize),

    #[error("nothing to save: no samples recorded")]
    EmptyRecording,

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Whether the capture loop must end the session on this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedPayload(_) | Self::EmptyRecording)
    }
}
