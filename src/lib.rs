//! USB HID relay board control
//!
//! Shared pieces of the `usbrelay` command-line tool. Board access lives in
//! `usbrelay-board`; this crate adds configuration for the front end.

pub mod config;

pub use config::RelayConfig;
