//! Command handlers for the CLI application.
//!
//! - `query`: Read-only commands (list, status, serial)
//! - `set`: Relay switching and serial programming

pub mod query;
pub mod set;

use usbrelay_board::{BoardError, FailurePolicy, RelayBoard};
use usbrelay_transport::BoxedTransport;

use crate::cli::Cli;
use usbrelay::RelayConfig;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Board selection after merging the config file with command-line flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub vendor_id: u16,
    pub product_id: u16,
    pub board: Option<String>,
    pub policy: FailurePolicy,
}

impl Settings {
    /// Flags win over the config file
    pub fn resolve(cli: &Cli, config: &RelayConfig) -> Self {
        Self {
            vendor_id: cli.vid.unwrap_or(config.vendor_id),
            product_id: cli.pid.unwrap_or(config.product_id),
            board: cli.board.clone().or_else(|| config.board.clone()),
            policy: if cli.legacy_defaults {
                FailurePolicy::DefaultOnError
            } else {
                config.failure_policy
            },
        }
    }
}

/// Open the selected board, or the first one found
pub fn open_board(
    transport: &BoxedTransport,
    settings: &Settings,
) -> Result<RelayBoard, BoardError> {
    let board = match &settings.board {
        Some(selector) => {
            RelayBoard::find(transport, settings.vendor_id, settings.product_id, selector)?
        }
        None => RelayBoard::enumerate(transport, settings.vendor_id, settings.product_id)?
            .into_iter()
            .next()
            .ok_or_else(|| BoardError::NotFound("no relay board attached".into()))?,
    };
    Ok(board.with_failure_policy(settings.policy))
}

/// Open a board and run a closure with it
pub fn with_board<F>(transport: &BoxedTransport, settings: &Settings, f: F) -> CommandResult
where
    F: FnOnce(&mut RelayBoard) -> CommandResult,
{
    let mut board = open_board(transport, settings)?;
    f(&mut board)
}

/// Warn when a relay number is past the end of the board
fn check_relay(board: &RelayBoard, relay: u8) {
    if relay >= board.relay_count() {
        eprintln!(
            "Board has {} relays (0-{}); relay {} ignored",
            board.relay_count(),
            board.relay_count().saturating_sub(1),
            relay
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use usbrelay_board::BoardVariant;
    use usbrelay_transport::mock::{MockBoard, MockTransport};
    use usbrelay_transport::BoxedTransport;

    pub const DCT: &str = "/dev/hidraw1";
    pub const UCR: &str = "/dev/hidraw2";

    pub fn bench() -> (MockTransport, BoxedTransport) {
        let mock = MockTransport::new();
        mock.add_board(
            MockBoard::new(DCT, "USBRelay2", BoardVariant::Dct, 2).with_usb_serial("A0001"),
        );
        mock.add_board(
            MockBoard::new(UCR, "HIDRelay", BoardVariant::Ucr, 9).with_ids(0x0416, 0x5020),
        );
        let transport: BoxedTransport = Arc::new(mock.clone());
        (mock, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_config() {
        let config = RelayConfig {
            vendor_id: 0x16C0,
            product_id: 0x05DF,
            failure_policy: FailurePolicy::Strict,
            board: Some("/dev/hidraw9".into()),
        };
        let cli = Cli::parse_from(["usbrelay", "--vid", "0x0416", "--legacy-defaults", "list"]);
        let settings = Settings::resolve(&cli, &config);
        assert_eq!(settings.vendor_id, 0x0416);
        assert_eq!(settings.product_id, 0x05DF);
        assert_eq!(settings.board.as_deref(), Some("/dev/hidraw9"));
        assert_eq!(settings.policy, FailurePolicy::DefaultOnError);
    }

    #[test]
    fn test_open_board_defaults_to_first() {
        let (_mock, transport) = bench();
        let board = open_board(&transport, &Settings::default()).unwrap();
        assert_eq!(board.path(), DCT);
    }

    #[test]
    fn test_open_board_by_selector_and_filter() {
        let (_mock, transport) = bench();
        let settings = Settings {
            vendor_id: 0x0416,
            ..Default::default()
        };
        assert_eq!(open_board(&transport, &settings).unwrap().path(), UCR);

        let settings = Settings {
            board: Some("A0001".into()),
            policy: FailurePolicy::DefaultOnError,
            ..Default::default()
        };
        let board = open_board(&transport, &settings).unwrap();
        assert_eq!(board.path(), DCT);
        assert_eq!(board.failure_policy(), FailurePolicy::DefaultOnError);
    }

    #[test]
    fn test_open_board_none_attached() {
        let (mock, transport) = bench();
        mock.remove_board(DCT);
        mock.remove_board(UCR);
        assert!(matches!(
            open_board(&transport, &Settings::default()),
            Err(BoardError::NotFound(_))
        ));
    }
}
