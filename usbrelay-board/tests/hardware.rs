//! Integration tests against a real relay board.
//!
//! These tests require a DCT or UCR board to be connected and will switch
//! its relays. Run with: cargo test -p usbrelay-board --test hardware -- --ignored --nocapture

use std::sync::Arc;

use usbrelay_board::RelayBoard;
use usbrelay_transport::{BoxedTransport, HidTransport};

fn first_board() -> RelayBoard {
    let transport: BoxedTransport = Arc::new(HidTransport::new());
    RelayBoard::enumerate(&transport, 0, 0)
        .expect("HID enumeration failed")
        .into_iter()
        .next()
        .expect("No relay board found — plug in a supported board")
}

#[test]
#[ignore] // requires hardware
fn toggle_first_relay_twice() {
    let mut board = first_board();
    println!(
        "{} board, {} relays at {}",
        board.variant(),
        board.relay_count(),
        board.path()
    );

    let before = board.is_closed(0).expect("state query failed");
    board.toggle_relay(0).expect("toggle failed");
    assert_eq!(board.is_closed(0).unwrap(), !before);
    board.toggle_relay(0).expect("toggle failed");
    assert_eq!(board.is_closed(0).unwrap(), before);
}

#[test]
#[ignore] // requires hardware
fn all_on_then_all_off() {
    let mut board = first_board();
    board.set_all_relays_on().expect("all on failed");
    for index in 0..board.relay_count().min(8) {
        assert!(board.is_closed(index).unwrap(), "relay {index} still open");
    }
    board.set_all_relays_off().expect("all off failed");
    assert_eq!(board.query_state().unwrap(), 0);
}
