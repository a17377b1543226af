//! Device identity used by the encoder: name, appearance and address.
//!
//! The identity is immutable once built. A process-wide copy lives behind a
//! critical-section mutex; readers take a snapshot so an encode never sees a
//! half-replaced identity.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::{
    DEVICE_APPEARANCE, DEVICE_NAME, DEVICE_PUBLIC_ADDR, DEVICE_RANDOM_ADDR, DEVICE_USE_RANDOM_ADDR,
};

/// Address type byte carried after the 6 address bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AddressType {
    Public = 0,
    Random = 1,
}

/// Name, appearance and addresses advertised by this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// Name buffer; may carry trailing NUL padding.
    pub name: &'static [u8],
    /// GAP appearance code.
    pub appearance: u16,
    /// Public address (little-endian).
    pub public_addr: [u8; 6],
    /// Static random address (little-endian).
    pub random_addr: [u8; 6],
    /// Advertise `random_addr` instead of `public_addr`.
    pub use_random_addr: bool,
}

impl DeviceIdentity {
    /// Identity built from `config.rs`.
    pub const DEFAULT: DeviceIdentity = DeviceIdentity {
        name: DEVICE_NAME,
        appearance: DEVICE_APPEARANCE,
        public_addr: DEVICE_PUBLIC_ADDR,
        random_addr: DEVICE_RANDOM_ADDR,
        use_random_addr: DEVICE_USE_RANDOM_ADDR,
    };

    /// Length of the name as a C string (bytes before the first NUL).
    pub fn name_len(&self) -> usize {
        self.name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len())
    }

    /// Configured name buffer length, the upper bound for a shortened name.
    pub fn name_max_len(&self) -> usize {
        self.name.len()
    }

    /// Address bytes and type selected by `use_random_addr`.
    pub fn address(&self) -> ([u8; 6], AddressType) {
        if self.use_random_addr {
            (self.random_addr, AddressType::Random)
        } else {
            (self.public_addr, AddressType::Public)
        }
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static DEVICE_IDENTITY: Mutex<CriticalSectionRawMutex, Cell<DeviceIdentity>> =
    Mutex::new(Cell::new(DeviceIdentity::DEFAULT));

/// Snapshot of the process-wide identity.
pub fn device_identity() -> DeviceIdentity {
    DEVICE_IDENTITY.lock(|cell| cell.get())
}

/// Replace the process-wide identity.
pub fn set_device_identity(identity: DeviceIdentity) {
    DEVICE_IDENTITY.lock(|cell| cell.set(identity));
    info!(
        "Device identity updated ({} byte name, appearance {=u16:#x})",
        identity.name_len(),
        identity.appearance
    );
}
