//! Relay board error types

use thiserror::Error;
use usbrelay_transport::TransportError;

/// Errors from relay board operations
#[derive(Error, Debug)]
pub enum BoardError {
    /// Product string carries the DCT prefix but no usable relay count
    #[error("Invalid relay count in product string {product:?}")]
    InvalidRelayCount { product: String },

    /// No board at the given path/selector, or it disappeared
    #[error("Board not found: {0}")]
    NotFound(String),

    /// The transport or the board itself reported a failure
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),
}

impl From<TransportError> for BoardError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::DeviceNotFound(what) => BoardError::NotFound(what),
            other => BoardError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device_maps_to_not_found() {
        let err: BoardError = TransportError::DeviceNotFound("/dev/hidraw7".into()).into();
        assert!(matches!(err, BoardError::NotFound(ref p) if p == "/dev/hidraw7"));
    }

    #[test]
    fn test_hardware_failure_stays_transport() {
        let err: BoardError = TransportError::HidError("broken pipe".into()).into();
        assert!(matches!(err, BoardError::Transport(_)));
    }
}
