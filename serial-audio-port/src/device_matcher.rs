//! Serial port enumeration and sensor matching.
//!
//! The board enumerates as a USB CDC serial port. Windows exposes the USB
//! product ID reliably; other platforms are matched on the port description.

use serialport::{SerialPortInfo, SerialPortType};

use serial_audio_core::models::error::CaptureError;
use serial_audio_core::traits::device_discovery::DeviceDiscovery;

/// USB product ID of the nRF52840 board (0x8045).
pub const NRF52840_PRODUCT_ID: u16 = 32837;

/// Text found in the nRF52840 board's port description.
pub const NRF52840_DESCRIPTION: &str = "nRF52840";

/// The parts of an enumerated port that matching looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescription {
    pub port_name: String,
    pub product_id: Option<u16>,
    pub description: Option<String>,
}

impl From<&SerialPortInfo> for PortDescription {
    fn from(info: &SerialPortInfo) -> Self {
        let (product_id, description) = match &info.port_type {
            SerialPortType::UsbPort(usb) => (Some(usb.pid), usb.product.clone()),
            _ => (None, None),
        };
        Self {
            port_name: info.port_name.clone(),
            product_id,
            description,
        }
    }
}

/// How a port is recognized as the sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    ProductId(u16),
    DescriptionContains(String),
}

impl MatchRule {
    /// The rule for the platform this binary was built for.
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "windows") {
            Self::ProductId(NRF52840_PRODUCT_ID)
        } else {
            Self::DescriptionContains(NRF52840_DESCRIPTION.into())
        }
    }

    pub fn matches(&self, port: &PortDescription) -> bool {
        match self {
            Self::ProductId(pid) => port.product_id == Some(*pid),
            Self::DescriptionContains(needle) => port
                .description
                .as_deref()
                .is_some_and(|d| d.contains(needle.as_str())),
        }
    }
}

/// Device discovery over the system's serial ports.
#[derive(Debug, Clone)]
pub struct UsbDeviceMatcher {
    rule: MatchRule,
}

impl UsbDeviceMatcher {
    pub fn new(rule: MatchRule) -> Self {
        Self { rule }
    }

    /// First port in `ports` accepted by the rule.
    pub fn find_in(&self, ports: &[PortDescription]) -> Result<String, CaptureError> {
        ports
            .iter()
            .find(|port| self.rule.matches(port))
            .map(|port| port.port_name.clone())
            .ok_or_else(|| CaptureError::DeviceNotFound(format!("no serial port matches {:?}", self.rule)))
    }
}

impl Default for UsbDeviceMatcher {
    fn default() -> Self {
        Self::new(MatchRule::for_current_platform())
    }
}

impl DeviceDiscovery for UsbDeviceMatcher {
    fn find_device(&self) -> Result<String, CaptureError> {
        let ports = serialport::available_ports()
            .map_err(|e| CaptureError::DeviceNotFound(format!("failed to enumerate serial ports: {}", e)))?;
        let ports: Vec<PortDescription> = ports.iter().map(PortDescription::from).collect();
        log::debug!("Enumerated {} serial ports", ports.len());

        let port_name = self.find_in(&ports)?;
        log::info!("Detected nRF on {}", port_name);
        Ok(port_name)
    }
}
