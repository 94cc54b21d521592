/// Capture loop state machine.
///
/// ```text
/// running → draining → closed
/// ```
///
/// There is no pause/resume: a stop request lets the current read finish,
/// then the byte source is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Running,
    Draining,
    Closed,
}

impl RecorderState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Closed => "closed",
        }
    }
}
