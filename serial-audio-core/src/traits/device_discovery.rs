use crate::models::error::CaptureError;

/// Locates the sensor among the attached devices.
///
/// Platform-specific matching rules live in the implementation so the core
/// stays platform independent.
pub trait DeviceDiscovery {
    /// Return the identifier (port path) of the matching device, or
    /// `CaptureError::DeviceNotFound`.
    fn find_device(&self) -> Result<String, CaptureError>;
}
