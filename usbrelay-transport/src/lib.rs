//! Report codec and transport layer for USB HID relay boards
//!
//! This crate provides the wire format for DCT ("USBRelayN") and UCR
//! ("HIDRelay") relay boards and a small transport abstraction:
//!
//! - [`codec`]: pure encoding/decoding of 9-byte reports
//! - [`HidTransport`]: backend over the `hidapi` crate
//! - [`MonitorTransport`]: middleware printing all reports
//! - `mock::MockTransport` (feature `mock`): simulated boards for tests

pub mod codec;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod types;

mod hid;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use codec::{BoardVariant, RelayStates, RelayTarget, Report};
pub use error::TransportError;
pub use hid::HidTransport;
pub use monitor::{MonitorConfig, MonitorTransport};
pub use types::DeviceDescriptor;

use std::sync::Arc;

/// Device enumeration and opening
///
/// Implementations hand out one [`ReportDevice`] per `open` call; dropping
/// it closes the underlying handle.
pub trait Transport: Send + Sync {
    /// List attached HID devices matching the filters (0 = any)
    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceDescriptor>, TransportError>;

    /// Open the device at `path`
    fn open(&self, path: &str) -> Result<Box<dyn ReportDevice>, TransportError>;
}

/// An open HID device handle
pub trait ReportDevice: Send {
    /// Write an output report (byte 0 is the report ID)
    ///
    /// # Returns
    /// Number of bytes written
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError>;

    /// Read a feature report into `buf` (byte 0 selects the report on entry)
    ///
    /// # Returns
    /// The backend's return value: number of bytes read for DCT boards, the
    /// relay bitmask for UCR boards
    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn Transport>;
