//! In-memory relay boards for tests
//!
//! `MockTransport` simulates the device side of the DCT and UCR protocols:
//! written reports switch simulated relays, feature reports return their
//! state. Every written report is recorded so tests can assert on the exact
//! wire traffic.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::protocol::{cmd, dct, ucr, SERIAL_LENGTH};
use crate::{BoardVariant, DeviceDescriptor, ReportDevice, Transport, TransportError};

/// One simulated device
#[derive(Debug, Clone)]
pub struct MockBoard {
    /// Enumeration data
    pub descriptor: DeviceDescriptor,
    /// Protocol the simulated firmware speaks
    pub variant: BoardVariant,
    /// Relays the firmware switches with "all" commands
    pub relay_count: u8,
    /// Relay states, bit `i` = relay `i`
    pub mask: u16,
    /// User serial in simulated NVRAM
    pub serial: [u8; SERIAL_LENGTH],
    /// Make every write fail
    pub fail_writes: bool,
    /// Make every feature report read fail
    pub fail_reads: bool,
}

impl MockBoard {
    /// Create a simulated device with the given product string
    pub fn new(path: &str, product_string: &str, variant: BoardVariant, relay_count: u8) -> Self {
        Self {
            descriptor: DeviceDescriptor {
                path: path.to_string(),
                serial_number: String::new(),
                release_number: 0x0100,
                manufacturer_string: "www.dcttech.com".to_string(),
                vendor_id: 0x16C0,
                product_id: 0x05DF,
                product_string: product_string.to_string(),
            },
            variant,
            relay_count,
            mask: 0,
            serial: [0; SERIAL_LENGTH],
            fail_writes: false,
            fail_reads: false,
        }
    }

    /// Set the vendor/product IDs reported by enumeration
    pub fn with_ids(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.descriptor.vendor_id = vendor_id;
        self.descriptor.product_id = product_id;
        self
    }

    /// Set the USB serial number reported by enumeration
    pub fn with_usb_serial(mut self, serial: &str) -> Self {
        self.descriptor.serial_number = serial.to_string();
        self
    }

    /// Preload the user serial stored in NVRAM
    pub fn with_user_serial(mut self, serial: &str) -> Self {
        for (slot, b) in self.serial.iter_mut().zip(serial.bytes()) {
            *slot = b;
        }
        self
    }

    /// User serial as a string (up to the first NUL)
    pub fn user_serial(&self) -> String {
        self.serial
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect()
    }

    fn all_mask(&self) -> u16 {
        1u16.checked_shl(u32::from(self.relay_count))
            .map_or(u16::MAX, |bit| bit - 1)
    }

    fn set_bit(&mut self, index: u8, on: bool) {
        let Some(bit) = 1u16.checked_shl(u32::from(index)) else {
            return;
        };
        if on {
            self.mask |= bit;
        } else {
            self.mask &= !bit;
        }
    }

    fn apply_output(&mut self, report: &[u8]) {
        let code = report.get(1).copied().unwrap_or_default();
        if code == cmd::SET_SERIAL {
            for (i, slot) in self.serial.iter_mut().enumerate() {
                *slot = report.get(2 + i).copied().unwrap_or_default();
            }
            return;
        }
        match self.variant {
            BoardVariant::Dct => {
                let index = report.get(2).copied().unwrap_or_default().wrapping_sub(1);
                match code {
                    cmd::ON => self.set_bit(index, true),
                    cmd::OFF => self.set_bit(index, false),
                    cmd::ALL_ON => self.mask = self.all_mask(),
                    cmd::ALL_OFF => self.mask = 0,
                    _ => {}
                }
            }
            BoardVariant::Ucr => {
                let on = code & ucr::ON_MASK == ucr::ON_BASE;
                self.set_bit(code & !ucr::ON_MASK, on);
            }
            BoardVariant::None => {}
        }
    }

    fn fill_feature(&self, buf: &mut [u8]) -> usize {
        match self.variant {
            BoardVariant::Dct => {
                buf.fill(0);
                for (slot, &b) in buf.iter_mut().zip(self.serial.iter()) {
                    *slot = b;
                }
                if let Some(slot) = buf.get_mut(dct::STATE_OFFSET) {
                    *slot = self.mask as u8;
                }
                buf.len()
            }
            BoardVariant::Ucr => usize::from(self.mask),
            BoardVariant::None => 0,
        }
    }
}

#[derive(Default)]
struct MockState {
    boards: Vec<MockBoard>,
    written: Vec<(String, Vec<u8>)>,
    opens: usize,
    open_handles: usize,
}

/// Transport serving [`MockBoard`]s
#[derive(Default, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create an empty mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a simulated device
    pub fn add_board(&self, board: MockBoard) {
        self.state.lock().boards.push(board);
    }

    /// Snapshot of the simulated device at `path`
    pub fn board(&self, path: &str) -> Option<MockBoard> {
        self.state
            .lock()
            .boards
            .iter()
            .find(|b| b.descriptor.path == path)
            .cloned()
    }

    /// Modify the simulated device at `path`
    pub fn update_board(&self, path: &str, f: impl FnOnce(&mut MockBoard)) {
        if let Some(board) = self
            .state
            .lock()
            .boards
            .iter_mut()
            .find(|b| b.descriptor.path == path)
        {
            f(board);
        }
    }

    /// Detach the simulated device at `path`
    pub fn remove_board(&self, path: &str) {
        self.state.lock().boards.retain(|b| b.descriptor.path != path);
    }

    /// Reports written to `path`, in order
    pub fn written(&self, path: &str) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .written
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Forget recorded reports
    pub fn clear_written(&self) {
        self.state.lock().written.clear();
    }

    /// Number of successful `open` calls so far
    pub fn opens(&self) -> usize {
        self.state.lock().opens
    }

    /// Number of handles currently open
    pub fn open_handles(&self) -> usize {
        self.state.lock().open_handles
    }
}

impl Transport for MockTransport {
    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceDescriptor>, TransportError> {
        Ok(self
            .state
            .lock()
            .boards
            .iter()
            .map(|b| b.descriptor.clone())
            .filter(|d| d.matches(vendor_id, product_id))
            .collect())
    }

    fn open(&self, path: &str) -> Result<Box<dyn ReportDevice>, TransportError> {
        let mut state = self.state.lock();
        if !state.boards.iter().any(|b| b.descriptor.path == path) {
            return Err(TransportError::DeviceNotFound(path.to_string()));
        }
        state.opens += 1;
        state.open_handles += 1;
        Ok(Box::new(MockDevice {
            state: Arc::clone(&self.state),
            path: path.to_string(),
        }))
    }
}

struct MockDevice {
    state: Arc<Mutex<MockState>>,
    path: String,
}

impl ReportDevice for MockDevice {
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let board = state
            .boards
            .iter_mut()
            .find(|b| b.descriptor.path == self.path)
            .ok_or_else(|| TransportError::DeviceNotFound(self.path.clone()))?;
        if board.fail_writes {
            return Err(TransportError::HidError("simulated write failure".into()));
        }
        board.apply_output(report);
        state.written.push((self.path.clone(), report.to_vec()));
        Ok(report.len())
    }

    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let state = self.state.lock();
        let board = state
            .boards
            .iter()
            .find(|b| b.descriptor.path == self.path)
            .ok_or_else(|| TransportError::DeviceNotFound(self.path.clone()))?;
        if board.fail_reads {
            return Err(TransportError::HidError("simulated read failure".into()));
        }
        Ok(board.fill_feature(buf))
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.open_handles = state.open_handles.saturating_sub(1);
    }
}
