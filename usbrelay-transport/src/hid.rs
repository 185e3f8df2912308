//! HID transport backed by hidapi

use std::ffi::CString;

use hidapi::{DeviceInfo, HidApi, HidDevice};
use tracing::debug;

use crate::error::TransportError;
use crate::types::DeviceDescriptor;
use crate::{ReportDevice, Transport};

/// Transport over the system HID stack
///
/// A fresh `HidApi` context is created for every enumeration and open, so
/// the device list always reflects what is plugged in right now.
#[derive(Debug, Default, Clone, Copy)]
pub struct HidTransport;

impl HidTransport {
    /// Create a new HID transport
    pub fn new() -> Self {
        Self
    }

    fn api() -> Result<HidApi, TransportError> {
        HidApi::new().map_err(|e| TransportError::HidError(e.to_string()))
    }
}

fn descriptor_from(info: &DeviceInfo) -> DeviceDescriptor {
    DeviceDescriptor {
        path: info.path().to_string_lossy().to_string(),
        serial_number: info.serial_number().unwrap_or_default().to_string(),
        release_number: info.release_number(),
        manufacturer_string: info.manufacturer_string().unwrap_or_default().to_string(),
        vendor_id: info.vendor_id(),
        product_id: info.product_id(),
        product_string: info.product_string().unwrap_or_default().to_string(),
    }
}

impl Transport for HidTransport {
    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceDescriptor>, TransportError> {
        let api = Self::api()?;
        let devices: Vec<_> = api
            .device_list()
            .map(descriptor_from)
            .filter(|d| d.matches(vendor_id, product_id))
            .collect();

        debug!(
            "Enumerated {} HID devices (filter {:04X}:{:04X})",
            devices.len(),
            vendor_id,
            product_id
        );
        Ok(devices)
    }

    fn open(&self, path: &str) -> Result<Box<dyn ReportDevice>, TransportError> {
        let api = Self::api()?;
        let c_path = CString::new(path)
            .map_err(|_| TransportError::DeviceNotFound(format!("invalid path: {path:?}")))?;
        let device = api.open_path(&c_path).map_err(|e| match TransportError::from(e) {
            TransportError::HidError(msg) => TransportError::DeviceNotFound(format!("{path}: {msg}")),
            other => other,
        })?;
        debug!("Opened {}", path);
        Ok(Box::new(HidHandle {
            device,
            path: path.to_string(),
        }))
    }
}

/// Open hidapi device; closed on drop
struct HidHandle {
    device: HidDevice,
    path: String,
}

impl ReportDevice for HidHandle {
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError> {
        let written = self.device.write(report)?;
        debug!("Wrote {} bytes to {}: {:02X?}", written, self.path, report);
        Ok(written)
    }

    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let read = self.device.get_feature_report(buf)?;
        debug!("Feature report from {} ({}): {:02X?}", self.path, read, buf);
        Ok(read)
    }
}

impl Drop for HidHandle {
    fn drop(&mut self) {
        debug!("Closed {}", self.path);
    }
}
