//! MonitorTransport middleware for watching relay traffic
//!
//! Wraps any [`Transport`] and prints every report written to, and every
//! feature report read from, the devices it opens.
//!
//! # Example
//!
//! ```ignore
//! use usbrelay_transport::{HidTransport, MonitorConfig, MonitorTransport};
//!
//! let transport = MonitorTransport::wrap(Arc::new(HidTransport::new()), MonitorConfig::default());
//! // Every relay command sent through `transport` is now printed
//! ```

use std::sync::Arc;

use crate::protocol::{cmd, describe_output};
use crate::{DeviceDescriptor, ReportDevice, Transport, TransportError};

/// Configuration for the MonitorTransport
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorConfig {
    /// Show raw hex dump alongside decoded output
    pub show_hex: bool,
}

impl MonitorConfig {
    /// Create config with hex output setting
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }
}

/// Transport middleware that prints all reports
pub struct MonitorTransport {
    inner: Arc<dyn Transport>,
    config: MonitorConfig,
}

impl MonitorTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: Arc<dyn Transport>, config: MonitorConfig) -> Arc<dyn Transport> {
        Arc::new(Self {
            inner: transport,
            config,
        })
    }
}

impl Transport for MonitorTransport {
    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceDescriptor>, TransportError> {
        let devices = self.inner.enumerate(vendor_id, product_id)?;
        eprintln!(
            "[enum] {:04X}:{:04X} -> {} device(s)",
            vendor_id,
            product_id,
            devices.len()
        );
        Ok(devices)
    }

    fn open(&self, path: &str) -> Result<Box<dyn ReportDevice>, TransportError> {
        let device = self.inner.open(path)?;
        eprintln!("[open] {path}");
        Ok(Box::new(MonitoredDevice {
            inner: device,
            path: path.to_string(),
            config: self.config,
        }))
    }
}

struct MonitoredDevice {
    inner: Box<dyn ReportDevice>,
    path: String,
    config: MonitorConfig,
}

impl MonitoredDevice {
    fn hex(&self, data: &[u8]) -> String {
        if self.config.show_hex {
            format!(" {:02X?}", data)
        } else {
            String::new()
        }
    }
}

impl ReportDevice for MonitoredDevice {
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError> {
        let result = self.inner.write_report(report);
        match &result {
            Ok(n) => eprintln!(
                "[send] {} ({} bytes){}",
                describe_output(report),
                n,
                self.hex(report)
            ),
            Err(e) => eprintln!("[send] {} failed: {}", describe_output(report), e),
        }
        result
    }

    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let request = buf.first().copied().unwrap_or_default();
        let result = self.inner.get_feature_report(buf);
        match &result {
            Ok(n) => eprintln!("[recv] {} -> {}{}", cmd::name(request), n, self.hex(buf)),
            Err(e) => eprintln!("[recv] {} failed: {}", cmd::name(request), e),
        }
        result
    }
}

impl Drop for MonitoredDevice {
    fn drop(&mut self) {
        eprintln!("[close] {}", self.path);
    }
}
