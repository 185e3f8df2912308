//! Query command handlers.

use usbrelay_board::{RelayBoard, RelayStates};
use usbrelay_transport::BoxedTransport;

use super::{with_board, CommandResult, Settings};

/// One-line summary of a board
pub fn format_board(board: &RelayBoard) -> String {
    format!(
        "{} {:04x}:{:04x} {} relays={} serial={:?} release={:04x} mfr={:?} path={}",
        board.variant(),
        board.vendor_id(),
        board.product_id(),
        board.product_string(),
        board.relay_count(),
        board.serial_number(),
        board.release_number(),
        board.manufacturer_string(),
        board.path()
    )
}

/// Relay states as `relay N: ON|off` lines
pub fn format_states(relay_count: u8, states: &RelayStates) -> Vec<String> {
    (0..relay_count)
        .map(|i| {
            let state = if states.is_on(i) { "ON" } else { "off" };
            format!("relay {i}: {state}")
        })
        .collect()
}

/// List attached relay boards
pub fn list(transport: &BoxedTransport, settings: &Settings) -> CommandResult {
    let boards = RelayBoard::enumerate(transport, settings.vendor_id, settings.product_id)?;
    if boards.is_empty() {
        println!("No relay boards found");
        return Ok(());
    }
    println!("Relay boards:");
    for board in &boards {
        println!("  {}", format_board(board));
    }
    Ok(())
}

/// Show relay states of the selected board
pub fn status(transport: &BoxedTransport, settings: &Settings) -> CommandResult {
    with_board(transport, settings, |board| {
        let mask = board.query_state()?;
        println!("{}", format_board(board));
        let states = RelayStates {
            mask,
            user_serial: None,
        };
        for line in format_states(board.relay_count(), &states) {
            println!("  {line}");
        }
        Ok(())
    })
}

/// Print the user serial stored on the board
pub fn serial(transport: &BoxedTransport, settings: &Settings) -> CommandResult {
    with_board(transport, settings, |board| {
        match board.user_serial()? {
            Some(serial) => println!("{serial}"),
            None => eprintln!("{} boards do not report a user serial", board.variant()),
        }
        Ok(())
    })
}
