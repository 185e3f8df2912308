//! Relay switching command handlers.

use usbrelay_transport::protocol::SERIAL_LENGTH;
use usbrelay_transport::BoxedTransport;

use super::{check_relay, with_board, CommandResult, Settings};

/// Switch one relay on or off
pub fn relay(
    transport: &BoxedTransport,
    settings: &Settings,
    relay: u8,
    on: bool,
) -> CommandResult {
    with_board(transport, settings, |board| {
        check_relay(board, relay);
        board.set_relay(relay, on)?;
        Ok(())
    })
}

/// Flip one relay
pub fn toggle(transport: &BoxedTransport, settings: &Settings, relay: u8) -> CommandResult {
    with_board(transport, settings, |board| {
        check_relay(board, relay);
        board.toggle_relay(relay)?;
        let state = if board.is_closed(relay)? { "ON" } else { "off" };
        println!("relay {relay}: {state}");
        Ok(())
    })
}

/// Switch every relay
pub fn all(transport: &BoxedTransport, settings: &Settings, on: bool) -> CommandResult {
    with_board(transport, settings, |board| {
        board.set_all_relays(on)?;
        Ok(())
    })
}

/// Store a new user serial
pub fn serial(transport: &BoxedTransport, settings: &Settings, serial: &str) -> CommandResult {
    if serial.chars().count() > SERIAL_LENGTH || !serial.is_ascii() {
        let stored: String = serial
            .chars()
            .take(SERIAL_LENGTH)
            .map(|c| if c.is_ascii() { c } else { '?' })
            .collect();
        eprintln!("Serial is stored as {SERIAL_LENGTH} ASCII characters; writing {stored:?}");
    }
    with_board(transport, settings, |board| {
        board.set_user_serial(serial)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_relay_on_off() {
        let (mock, transport) = bench();
        let settings = Settings::default();
        relay(&transport, &settings, 1, true).unwrap();
        assert_eq!(mock.board(DCT).unwrap().mask, 0b10);
        relay(&transport, &settings, 1, false).unwrap();
        assert_eq!(mock.board(DCT).unwrap().mask, 0);
    }

    #[test]
    fn test_toggle_and_all_on_ucr() {
        let (mock, transport) = bench();
        let settings = Settings {
            board: Some(UCR.into()),
            ..Default::default()
        };
        toggle(&transport, &settings, 4).unwrap();
        assert_eq!(mock.board(UCR).unwrap().mask, 0b1_0000);

        all(&transport, &settings, true).unwrap();
        assert_eq!(mock.board(UCR).unwrap().mask, 0x1FF);
    }

    #[test]
    fn test_set_serial_truncates() {
        let (mock, transport) = bench();
        serial(&transport, &Settings::default(), "RELAYBOX").unwrap();
        assert_eq!(mock.board(DCT).unwrap().user_serial(), "RELAY");
    }

    #[test]
    fn test_failures_surface_unless_legacy() {
        let (mock, transport) = bench();
        mock.update_board(DCT, |b| b.fail_writes = true);

        assert!(relay(&transport, &Settings::default(), 0, true).is_err());

        let legacy = Settings {
            policy: usbrelay_board::FailurePolicy::DefaultOnError,
            ..Default::default()
        };
        assert!(relay(&transport, &legacy, 0, true).is_ok());
    }
}
