//! High-level interface for USB HID relay boards
//!
//! This crate turns HID devices into typed relay boards and provides the
//! relay-control API on top of any [`usbrelay_transport::Transport`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use usbrelay_board::RelayBoard;
//! use usbrelay_transport::HidTransport;
//!
//! let transport = Arc::new(HidTransport::new()) as usbrelay_transport::BoxedTransport;
//! for mut board in RelayBoard::enumerate(&transport, 0, 0)? {
//!     board.toggle_relay(0)?;
//! }
//! ```

pub mod board;
pub mod classify;
pub mod error;
pub mod policy;

pub use board::{BoardDescriptor, RelayBoard};
pub use classify::{classify, relay_count};
pub use error::BoardError;
pub use policy::FailurePolicy;

// Re-export the codec types consumers need alongside boards
pub use usbrelay_transport::{BoardVariant, RelayStates};
