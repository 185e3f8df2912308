//! Configuration file for the command-line tool
//!
//! Loaded from `~/.config/usbrelay/config.toml` unless `--config` is given.
//! Every field is optional; command-line flags override the file.
//!
//! ```toml
//! vendor_id = 0x16c0
//! product_id = 0x05df
//! failure_policy = "default-on-error"
//! board = "/dev/hidraw3"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use usbrelay_board::FailurePolicy;

/// Front-end settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Vendor ID filter for enumeration (0 = any)
    pub vendor_id: u16,
    /// Product ID filter for enumeration (0 = any)
    pub product_id: u16,
    /// What to do when a board does not answer
    pub failure_policy: FailurePolicy,
    /// Default board selector (device path or USB serial)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
}

impl RelayConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("usbrelay")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: RelayConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
