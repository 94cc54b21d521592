use crate::models::error::CaptureError;
use crate::models::recording_result::SaveResult;
use crate::models::state::RecorderState;

/// Event delegate for recorder notifications.
///
/// State and error events are delivered on the capture thread, save events on
/// whichever thread called `save`. Keep implementations short.
pub trait RecorderDelegate: Send + Sync {
    fn on_state_changed(&self, state: RecorderState);

    /// Called for every error the capture loop observes, fatal or not.
    fn on_error(&self, error: &CaptureError);

    fn on_saved(&self, result: &SaveResult);
}
