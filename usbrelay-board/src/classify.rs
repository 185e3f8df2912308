//! Board classification by USB product string

use usbrelay_transport::protocol::{dct, ucr};
use usbrelay_transport::BoardVariant;

use crate::error::BoardError;

/// Decide the board family from a product string.
///
/// Case-sensitive prefix match at position 0.
pub fn classify(product_string: &str) -> BoardVariant {
    if product_string.starts_with(dct::PRODUCT_PREFIX) {
        BoardVariant::Dct
    } else if product_string.starts_with(ucr::PRODUCT_PREFIX) {
        BoardVariant::Ucr
    } else {
        BoardVariant::None
    }
}

/// Number of relays on a board of `variant` named `product_string`.
///
/// DCT boards embed the count after the 8-character prefix
/// (`"USBRelay08"` is an 8-relay board); UCR boards always have 9.
pub fn relay_count(variant: BoardVariant, product_string: &str) -> Result<u8, BoardError> {
    match variant {
        BoardVariant::Dct => product_string
            .get(dct::PRODUCT_PREFIX.len()..)
            .and_then(|suffix| suffix.parse::<u8>().ok())
            .ok_or_else(|| BoardError::InvalidRelayCount {
                product: product_string.to_string(),
            }),
        BoardVariant::Ucr => Ok(ucr::RELAY_COUNT),
        BoardVariant::None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(classify("USBRelay2"), BoardVariant::Dct);
        assert_eq!(classify("USBRelay08"), BoardVariant::Dct);
        assert_eq!(classify("HIDRelay"), BoardVariant::Ucr);
        assert_eq!(classify("HIDRelay-anything"), BoardVariant::Ucr);
    }

    #[test]
    fn test_classify_rejects_others() {
        assert_eq!(classify("usbrelay2"), BoardVariant::None);
        assert_eq!(classify("My USBRelay2"), BoardVariant::None);
        assert_eq!(classify("Keyboard"), BoardVariant::None);
        assert_eq!(classify(""), BoardVariant::None);
    }

    #[test]
    fn test_dct_count_from_suffix() {
        assert_eq!(relay_count(BoardVariant::Dct, "USBRelay08").unwrap(), 8);
        assert_eq!(relay_count(BoardVariant::Dct, "USBRelay1").unwrap(), 1);
        assert_eq!(relay_count(BoardVariant::Dct, "USBRelay0").unwrap(), 0);
    }

    #[test]
    fn test_dct_count_rejects_non_numbers() {
        assert!(matches!(
            relay_count(BoardVariant::Dct, "USBRelayNotANumber"),
            Err(BoardError::InvalidRelayCount { .. })
        ));
        assert!(relay_count(BoardVariant::Dct, "USBRelay").is_err());
        assert!(relay_count(BoardVariant::Dct, "USBRelay-2").is_err());
    }

    #[test]
    fn test_ucr_count_is_fixed() {
        assert_eq!(relay_count(BoardVariant::Ucr, "HIDRelay").unwrap(), 9);
        assert_eq!(relay_count(BoardVariant::Ucr, "HIDRelay2").unwrap(), 9);
        assert_eq!(relay_count(BoardVariant::Ucr, "HIDRelayXYZ").unwrap(), 9);
    }

    #[test]
    fn test_none_count_is_zero() {
        assert_eq!(relay_count(BoardVariant::None, "Keyboard").unwrap(), 0);
    }
}
