// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "usbrelay")]
#[command(author, version, about = "Control DCT and UCR USB HID relay boards")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Vendor ID filter (hex like 0x16c0 or decimal, 0 = any)
    #[arg(long, global = true, value_parser = parse_id)]
    pub vid: Option<u16>,

    /// Product ID filter (hex like 0x05df or decimal, 0 = any)
    #[arg(long, global = true, value_parser = parse_id)]
    pub pid: Option<u16>,

    /// Board to operate on (device path or USB serial; default: first found)
    #[arg(short, long, global = true)]
    pub board: Option<String>,

    /// Print every report sent to and read from the board
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show raw hex dump in monitor output
    #[arg(long, global = true)]
    pub hex: bool,

    /// Treat board failures as "all relays off" instead of errors
    #[arg(long, global = true)]
    pub legacy_defaults: bool,

    /// Config file path (default: ~/.config/usbrelay/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List attached relay boards
    #[command(visible_aliases = ["ls", "l"])]
    List,

    /// Show relay states of a board
    #[command(visible_aliases = ["state", "st"])]
    Status,

    /// Close (switch on) a relay
    On {
        /// Relay number, starting at 0
        relay: u8,
    },

    /// Open (switch off) a relay
    Off {
        /// Relay number, starting at 0
        relay: u8,
    },

    /// Flip a relay
    #[command(visible_alias = "t")]
    Toggle {
        /// Relay number, starting at 0
        relay: u8,
    },

    /// Close every relay
    AllOn,

    /// Open every relay
    AllOff,

    /// Print the user serial stored on the board
    Serial,

    /// Store a new user serial (first 5 ASCII characters)
    SetSerial {
        /// New serial
        serial: String,
    },
}

/// Parse a USB ID given as hex (`0x16c0`) or decimal
pub fn parse_id(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid USB ID {s:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("0x16c0"), Ok(0x16C0));
        assert_eq!(parse_id("0X05DF"), Ok(0x05DF));
        assert_eq!(parse_id("1234"), Ok(1234));
        assert!(parse_id("0xZZ").is_err());
        assert!(parse_id("70000").is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["usbrelay", "on", "3", "--vid", "0x16c0", "--monitor"])
            .unwrap();
        assert_eq!(cli.vid, Some(0x16C0));
        assert!(cli.monitor);
        assert!(matches!(cli.command, Some(Commands::On { relay: 3 })));
    }
}
