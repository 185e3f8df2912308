//! Report codec for DCT and UCR relay boards
//!
//! Pure translation between relay commands/state and the 9-byte report
//! format. The two board families differ only in wire layout, so the
//! layout is chosen by matching on [`BoardVariant`].
//!
//! Output report layouts:
//!
//! ```text
//! DCT:  [0x00] [cmd] [relay+1] [0x00 x6]      cmd = ON/OFF/ALL_ON/ALL_OFF
//! UCR:  [0x00] [0xF0 + relay | relay] [0x00 x7]
//! both: [0x00] [0xFA] [serial x5] [0x00 x2]   set user serial
//! ```

use crate::protocol::{cmd, dct, ucr, REPORT_SIZE, SERIAL_LENGTH};

/// A single 9-byte report buffer
pub type Report = [u8; REPORT_SIZE];

/// Relay board family, decided from the USB product string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoardVariant {
    /// Not a relay board
    #[default]
    None,
    /// "USBRelayN" boards (relay count in the product string)
    Dct,
    /// "HIDRelay" boards (fixed 9 relays)
    Ucr,
}

impl BoardVariant {
    /// Short family name
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dct => "DCT",
            Self::Ucr => "UCR",
        }
    }

    /// Whether this variant has a single "switch every relay" command
    pub fn supports_all_command(&self) -> bool {
        matches!(self, Self::Dct)
    }
}

impl std::fmt::Display for BoardVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which relays a command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayTarget {
    /// One relay, zero-based
    Single(u8),
    /// Every relay on the board
    All,
}

/// Decoded reply to a state query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStates {
    /// Bit `i` is set when relay `i` is on (closed)
    pub mask: u8,
    /// User serial recovered from the reply, when the variant carries one
    pub user_serial: Option<String>,
}

impl RelayStates {
    /// Whether relay `index` is on. Relays beyond the 8-bit mask report off.
    pub fn is_on(&self, index: u8) -> bool {
        self.mask.checked_shr(u32::from(index)).unwrap_or(0) & 1 == 1
    }
}

/// Build the output report switching `target` to `on`.
///
/// Returns `None` when the variant has no encoding for the target: UCR has
/// no "all relays" command, and `None` boards accept nothing. Relay index
/// range is not checked here.
pub fn encode_command(variant: BoardVariant, target: RelayTarget, on: bool) -> Option<Report> {
    let mut buf = [0u8; REPORT_SIZE];
    match (variant, target) {
        (BoardVariant::Dct, RelayTarget::Single(index)) => {
            buf[1] = if on { cmd::ON } else { cmd::OFF };
            buf[2] = index.wrapping_add(1);
        }
        (BoardVariant::Dct, RelayTarget::All) => {
            buf[1] = if on { cmd::ALL_ON } else { cmd::ALL_OFF };
        }
        (BoardVariant::Ucr, RelayTarget::Single(index)) => {
            let base = if on { ucr::ON_BASE } else { 0 };
            buf[1] = base.wrapping_add(index);
        }
        (BoardVariant::Ucr, RelayTarget::All) | (BoardVariant::None, _) => return None,
    }
    Some(buf)
}

/// Build the feature-report buffer used to query relay states.
///
/// Byte 0 carries the GET_FEATURES command; the reply overwrites the buffer.
pub fn encode_state_request() -> Report {
    let mut buf = [0u8; REPORT_SIZE];
    buf[0] = cmd::GET_FEATURES;
    buf
}

/// Build the output report storing `serial` as the board's user serial.
///
/// The serial is truncated to [`SERIAL_LENGTH`] bytes and zero padded.
/// Non-ASCII characters are replaced with `?`.
pub fn encode_set_serial(serial: &str) -> Report {
    let mut buf = [0u8; REPORT_SIZE];
    buf[1] = cmd::SET_SERIAL;
    for (slot, ch) in buf[2..2 + SERIAL_LENGTH].iter_mut().zip(serial.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
    buf
}

/// Decode a feature-report reply.
///
/// `returned` is the transport's return value for the exchange. DCT boards
/// keep the bitmask at a fixed offset of the reply; UCR boards hand the
/// bitmask back as the return value itself and the buffer is ignored.
// The UCR path looks like a protocol inconsistency but matches shipping
// hardware behaviour; keep both until confirmed on a UCR board.
pub fn decode_states(variant: BoardVariant, reply: &Report, returned: usize) -> RelayStates {
    match variant {
        BoardVariant::Dct => RelayStates {
            mask: reply[dct::STATE_OFFSET],
            user_serial: Some(decode_user_serial(reply)),
        },
        BoardVariant::Ucr => RelayStates {
            mask: returned as u8,
            user_serial: None,
        },
        BoardVariant::None => RelayStates::default(),
    }
}

/// Extract the user serial: the NUL-terminated run starting at offset 0
fn decode_user_serial(reply: &Report) -> String {
    reply
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dct_single_relay_on() {
        let report = encode_command(BoardVariant::Dct, RelayTarget::Single(3), true).unwrap();
        assert_eq!(report, [0x00, 0xFF, 0x04, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_dct_single_relay_off() {
        let report = encode_command(BoardVariant::Dct, RelayTarget::Single(0), false).unwrap();
        assert_eq!(report, [0x00, 0xFD, 0x01, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_dct_all_leaves_index_zero() {
        let on = encode_command(BoardVariant::Dct, RelayTarget::All, true).unwrap();
        let off = encode_command(BoardVariant::Dct, RelayTarget::All, false).unwrap();
        assert_eq!(on, [0x00, 0xFE, 0x00, 0, 0, 0, 0, 0, 0]);
        assert_eq!(off, [0x00, 0xFC, 0x00, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_ucr_single_relay() {
        let on = encode_command(BoardVariant::Ucr, RelayTarget::Single(5), true).unwrap();
        let off = encode_command(BoardVariant::Ucr, RelayTarget::Single(5), false).unwrap();
        assert_eq!(on, [0x00, 0xF5, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(off, [0x00, 0x05, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_no_encoding_for_ucr_all_or_none_variant() {
        assert!(encode_command(BoardVariant::Ucr, RelayTarget::All, true).is_none());
        assert!(encode_command(BoardVariant::None, RelayTarget::Single(0), true).is_none());
    }

    #[test]
    fn test_codec_does_not_range_check() {
        let report = encode_command(BoardVariant::Dct, RelayTarget::Single(200), true).unwrap();
        assert_eq!(report[2], 201);
    }

    #[test]
    fn test_state_request() {
        assert_eq!(encode_state_request(), [0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_set_serial_truncates() {
        let report = encode_set_serial("ABCDEFGH");
        assert_eq!(report, [0x00, 0xFA, b'A', b'B', b'C', b'D', b'E', 0, 0]);
    }

    #[test]
    fn test_set_serial_pads_short_values() {
        let report = encode_set_serial("AB");
        assert_eq!(report, [0x00, 0xFA, b'A', b'B', 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_dct_decode_reads_offset_seven() {
        let reply = [b'Q', b'W', b'E', b'R', b'T', 0, 0, 0b0000_1000, 0];
        let states = decode_states(BoardVariant::Dct, &reply, REPORT_SIZE);
        assert_eq!(states.mask, 0b0000_1000);
        assert!(states.is_on(3));
        assert!(!states.is_on(2));
        assert_eq!(states.user_serial.as_deref(), Some("QWERT"));
    }

    #[test]
    fn test_ucr_decode_uses_return_value() {
        let reply = [0xFF; REPORT_SIZE];
        let states = decode_states(BoardVariant::Ucr, &reply, 0b101);
        assert_eq!(states.mask, 0b101);
        assert_eq!(states.user_serial, None);
    }

    #[test]
    fn test_dct_round_trip_relay_three() {
        let on = encode_command(BoardVariant::Dct, RelayTarget::Single(3), true).unwrap();
        assert_eq!(on[2], 4);
        let reply = [0, 0, 0, 0, 0, 0, 0, 1 << 3, 0];
        assert!(decode_states(BoardVariant::Dct, &reply, 9).is_on(3));

        let off = encode_command(BoardVariant::Dct, RelayTarget::Single(3), false).unwrap();
        assert_eq!(off[1], cmd::OFF);
        let reply = [0, 0, 0, 0, 0, 0, 0, 0b1111_0111, 0];
        assert!(!decode_states(BoardVariant::Dct, &reply, 9).is_on(3));
    }

    #[test]
    fn test_is_on_beyond_mask_width() {
        let states = RelayStates {
            mask: 0xFF,
            user_serial: None,
        };
        assert!(states.is_on(7));
        assert!(!states.is_on(8));
    }
}
