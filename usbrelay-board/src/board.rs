//! Relay board sessions
//!
//! A [`RelayBoard`] is an identity snapshot taken at enumeration time plus
//! the transport needed to reach the board again. It never keeps a device
//! handle: every operation opens the board, exchanges one report, and
//! closes it again when the handle is dropped.

use std::fmt;

use tracing::{debug, info, warn};
use usbrelay_transport::codec::{self, RelayStates, RelayTarget, Report};
use usbrelay_transport::protocol::describe_output;
use usbrelay_transport::{
    BoardVariant, BoxedTransport, DeviceDescriptor, ReportDevice, TransportError,
};

use crate::classify::{classify, relay_count};
use crate::error::BoardError;
use crate::policy::FailurePolicy;

/// Identity of a relay board, captured at enumeration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDescriptor {
    /// Raw HID device data
    pub device: DeviceDescriptor,
    /// Board family
    pub variant: BoardVariant,
    /// Number of relays on the board
    pub relay_count: u8,
}

impl BoardDescriptor {
    /// Classify a HID device.
    ///
    /// Returns `Ok(None)` for devices that are not relay boards, and an
    /// error for DCT boards whose product string has no usable relay count.
    pub fn classify(device: DeviceDescriptor) -> Result<Option<Self>, BoardError> {
        let variant = classify(&device.product_string);
        if variant == BoardVariant::None {
            return Ok(None);
        }
        let relay_count = relay_count(variant, &device.product_string)?;
        Ok(Some(Self {
            device,
            variant,
            relay_count,
        }))
    }
}

/// A USB HID relay board
#[derive(Clone)]
pub struct RelayBoard {
    descriptor: BoardDescriptor,
    transport: BoxedTransport,
    policy: FailurePolicy,
    user_serial: Option<String>,
}

impl fmt::Debug for RelayBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayBoard")
            .field("descriptor", &self.descriptor)
            .field("policy", &self.policy)
            .field("user_serial", &self.user_serial)
            .finish_non_exhaustive()
    }
}

impl RelayBoard {
    /// Create a board from a classified descriptor
    pub fn new(transport: BoxedTransport, descriptor: BoardDescriptor) -> Self {
        Self {
            descriptor,
            transport,
            policy: FailurePolicy::default(),
            user_serial: None,
        }
    }

    /// List attached relay boards.
    ///
    /// `vendor_id`/`product_id` filter the HID enumeration (0 = any).
    /// Devices that are not relay boards are skipped; boards come back in
    /// transport order.
    ///
    /// # Errors
    /// Fails if the transport cannot enumerate, or if a DCT board's
    /// product string carries no usable relay count.
    pub fn enumerate(
        transport: &BoxedTransport,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<RelayBoard>, BoardError> {
        let mut boards = Vec::new();
        for device in transport.enumerate(vendor_id, product_id)? {
            let path = device.path.clone();
            match BoardDescriptor::classify(device)? {
                Some(descriptor) => {
                    debug!(
                        "Found {} board with {} relays at {}",
                        descriptor.variant, descriptor.relay_count, path
                    );
                    boards.push(RelayBoard::new(transport.clone(), descriptor));
                }
                None => debug!("Skipping non-relay device {}", path),
            }
        }
        info!("Found {} relay boards", boards.len());
        Ok(boards)
    }

    /// Find the board whose device path or USB serial number is `selector`
    pub fn find(
        transport: &BoxedTransport,
        vendor_id: u16,
        product_id: u16,
        selector: &str,
    ) -> Result<RelayBoard, BoardError> {
        Self::enumerate(transport, vendor_id, product_id)?
            .into_iter()
            .find(|b| b.path() == selector || b.serial_number() == selector)
            .ok_or_else(|| BoardError::NotFound(selector.to_string()))
    }

    /// Set how transport failures are handled
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    // === Identity ===

    /// Full descriptor
    pub fn descriptor(&self) -> &BoardDescriptor {
        &self.descriptor
    }

    /// Device path used to reopen the board
    pub fn path(&self) -> &str {
        &self.descriptor.device.path
    }

    /// USB serial number
    pub fn serial_number(&self) -> &str {
        &self.descriptor.device.serial_number
    }

    /// Device release number
    pub fn release_number(&self) -> u16 {
        self.descriptor.device.release_number
    }

    /// Manufacturer string
    pub fn manufacturer_string(&self) -> &str {
        &self.descriptor.device.manufacturer_string
    }

    /// Product string
    pub fn product_string(&self) -> &str {
        &self.descriptor.device.product_string
    }

    /// USB Vendor ID
    pub fn vendor_id(&self) -> u16 {
        self.descriptor.device.vendor_id
    }

    /// USB Product ID
    pub fn product_id(&self) -> u16 {
        self.descriptor.device.product_id
    }

    /// Board family
    pub fn variant(&self) -> BoardVariant {
        self.descriptor.variant
    }

    /// Number of relays
    pub fn relay_count(&self) -> u8 {
        self.descriptor.relay_count
    }

    /// Failure policy in effect
    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// User serial seen by the most recent state query, if any
    pub fn cached_user_serial(&self) -> Option<&str> {
        self.user_serial.as_deref()
    }

    fn has_relay(&self, index: u8) -> bool {
        index < self.relay_count()
    }

    // === Session plumbing ===

    /// Open the board, run `f` against the handle, close it
    fn with_session<T>(
        &self,
        f: impl FnOnce(&dyn ReportDevice) -> Result<T, TransportError>,
    ) -> Result<T, BoardError> {
        let device = self.transport.open(self.path())?;
        Ok(f(device.as_ref())?)
    }

    /// Apply the failure policy to an operation's result
    fn absorb<T>(
        &self,
        op: &str,
        result: Result<T, BoardError>,
        fallback: T,
    ) -> Result<T, BoardError> {
        match result {
            Err(e) if self.policy.absorbs_errors() => {
                warn!("{} on {} failed: {}", op, self.path(), e);
                Ok(fallback)
            }
            other => other,
        }
    }

    fn write(&self, report: &Report) -> Result<(), BoardError> {
        debug!(
            "{} {} -> {}: {:02X?}",
            self.variant(),
            describe_output(report),
            self.path(),
            report
        );
        let result = self
            .with_session(|device| device.write_report(report))
            .map(|written| {
                debug!("Wrote {} bytes", written);
            });
        self.absorb("write", result, ())
    }

    fn read_states(&self) -> Result<RelayStates, BoardError> {
        let mut buf = codec::encode_state_request();
        let returned = self.with_session(|device| device.get_feature_report(&mut buf))?;
        let states = codec::decode_states(self.variant(), &buf, returned);
        debug!(
            "States of {}: mask={:08b} serial={:?}",
            self.path(),
            states.mask,
            states.user_serial
        );
        Ok(states)
    }

    // === Relay state ===

    /// Read the relay bitmask (bit `i` = relay `i` closed).
    ///
    /// Also refreshes the cached user serial when the board reports one.
    pub fn query_state(&mut self) -> Result<u8, BoardError> {
        match self.read_states() {
            Ok(states) => {
                if states.user_serial.is_some() {
                    self.user_serial = states.user_serial;
                }
                Ok(states.mask)
            }
            Err(e) => self.absorb("state query", Err(e), 0),
        }
    }

    /// Whether relay `index` is open (off). Relays the board does not
    /// have always report open.
    pub fn is_open(&mut self, index: u8) -> Result<bool, BoardError> {
        if !self.has_relay(index) {
            return Ok(true);
        }
        let states = RelayStates {
            mask: self.query_state()?,
            user_serial: None,
        };
        Ok(!states.is_on(index))
    }

    /// Whether relay `index` is closed (on)
    pub fn is_closed(&mut self, index: u8) -> Result<bool, BoardError> {
        Ok(!self.is_open(index)?)
    }

    // === Relay control ===

    /// Switch relay `index`. Indices past the relay count are ignored.
    pub fn set_relay(&self, index: u8, on: bool) -> Result<(), BoardError> {
        if !self.has_relay(index) {
            debug!("Ignoring relay {} on {}-relay board", index, self.relay_count());
            return Ok(());
        }
        match codec::encode_command(self.variant(), RelayTarget::Single(index), on) {
            Some(report) => self.write(&report),
            None => Ok(()),
        }
    }

    /// Close relay `index`
    pub fn set_relay_on(&self, index: u8) -> Result<(), BoardError> {
        self.set_relay(index, true)
    }

    /// Open relay `index`
    pub fn set_relay_off(&self, index: u8) -> Result<(), BoardError> {
        self.set_relay(index, false)
    }

    /// Flip relay `index`.
    ///
    /// Reads the current state then writes the opposite; a change made by
    /// someone else in between is lost.
    pub fn toggle_relay(&mut self, index: u8) -> Result<(), BoardError> {
        if !self.has_relay(index) {
            return Ok(());
        }
        let closed = self.is_closed(index)?;
        self.set_relay(index, !closed)
    }

    /// Switch every relay.
    ///
    /// DCT boards take a single command; UCR boards have none, so each
    /// relay is switched in turn.
    pub fn set_all_relays(&self, on: bool) -> Result<(), BoardError> {
        if let Some(report) = codec::encode_command(self.variant(), RelayTarget::All, on) {
            return self.write(&report);
        }
        for index in 0..self.relay_count() {
            self.set_relay(index, on)?;
        }
        Ok(())
    }

    /// Close every relay
    pub fn set_all_relays_on(&self) -> Result<(), BoardError> {
        self.set_all_relays(true)
    }

    /// Open every relay
    pub fn set_all_relays_off(&self) -> Result<(), BoardError> {
        self.set_all_relays(false)
    }

    // === User serial ===

    /// Read the user serial stored on the board.
    ///
    /// Queries the board; `None` when the board family does not report one.
    pub fn user_serial(&mut self) -> Result<Option<String>, BoardError> {
        self.query_state()?;
        Ok(self.user_serial.clone())
    }

    /// Store a new user serial (first 5 ASCII characters, zero padded).
    ///
    /// Not read back.
    pub fn set_user_serial(&self, serial: &str) -> Result<(), BoardError> {
        self.write(&codec::encode_set_serial(serial))
    }
}
