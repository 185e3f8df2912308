//! Common types for transport layer

/// Identity of one HID device as reported by enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Platform device path, used to re-open the device
    pub path: String,
    /// USB serial number string
    pub serial_number: String,
    /// Device release number (bcdDevice)
    pub release_number: u16,
    /// Manufacturer string
    pub manufacturer_string: String,
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
    /// Product string; relay boards are recognised by its prefix
    pub product_string: String,
}

impl DeviceDescriptor {
    /// Whether this device passes a vendor/product filter (0 = any)
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        (vendor_id == 0 || self.vendor_id == vendor_id)
            && (product_id == 0 || self.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_filters_are_wildcards() {
        let desc = DeviceDescriptor {
            vendor_id: 0x16C0,
            product_id: 0x05DF,
            ..Default::default()
        };
        assert!(desc.matches(0, 0));
        assert!(desc.matches(0x16C0, 0));
        assert!(desc.matches(0, 0x05DF));
        assert!(desc.matches(0x16C0, 0x05DF));
        assert!(!desc.matches(0x1234, 0));
        assert!(!desc.matches(0x16C0, 0x0001));
    }
}
