//! Protocol constants for DCT and UCR relay boards

/// Every report exchanged with a relay board is 9 bytes: report ID + 8 payload bytes
pub const REPORT_SIZE: usize = 9;

/// Maximum length of the user serial stored in board NVRAM
pub const SERIAL_LENGTH: usize = 5;

/// Report commands (byte 1 of an output report)
pub mod cmd {
    /// Request relay states + user serial (written to byte 0 of the feature buffer)
    pub const GET_FEATURES: u8 = 0x01;
    /// Turn all relays on (DCT)
    pub const ALL_ON: u8 = 0xFE;
    /// Turn all relays off (DCT)
    pub const ALL_OFF: u8 = 0xFC;
    /// Turn one relay on (DCT)
    pub const ON: u8 = 0xFF;
    /// Turn one relay off (DCT)
    pub const OFF: u8 = 0xFD;
    /// Store user serial in NVRAM
    pub const SET_SERIAL: u8 = 0xFA;

    /// Get human-readable name for command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            GET_FEATURES => "GET_FEATURES",
            ALL_ON => "ALL_ON",
            ALL_OFF => "ALL_OFF",
            ON => "ON",
            OFF => "OFF",
            SET_SERIAL => "SET_SERIAL",
            _ => "UNKNOWN",
        }
    }
}

/// DCT boards ("USBRelayN" product string)
pub mod dct {
    /// Product-string prefix; the relay count follows it
    pub const PRODUCT_PREFIX: &str = "USBRelay";
    /// Offset of the relay bitmask in a feature report reply
    pub const STATE_OFFSET: usize = 7;
}

/// UCR boards ("HIDRelay" product string)
pub mod ucr {
    /// Product-string prefix
    pub const PRODUCT_PREFIX: &str = "HIDRelay";
    /// UCR boards always expose 9 relays
    pub const RELAY_COUNT: u8 = 9;
    /// Added to the relay index to switch it on; a bare index switches it off
    pub const ON_BASE: u8 = 0xF0;
    /// Mask separating the command nibble from the relay index
    pub const ON_MASK: u8 = 0xF0;
}

/// Human-readable name for the command carried by an output report.
///
/// UCR reports have no command byte of their own, so they are named by
/// whether the on-nibble is set.
pub fn describe_output(report: &[u8]) -> String {
    let Some(&code) = report.get(1) else {
        return "EMPTY".to_string();
    };
    match code {
        cmd::ON | cmd::OFF | cmd::ALL_ON | cmd::ALL_OFF | cmd::SET_SERIAL => {
            cmd::name(code).to_string()
        }
        c if c & ucr::ON_MASK == ucr::ON_BASE => format!("UCR_ON({})", c & !ucr::ON_MASK),
        c => format!("UCR_OFF({})", c),
    }
}
