//! Compile-time configuration of the device identity and advertising limits.
//!
//! These values replace the SDK's build-time macros. They seed
//! [`DeviceIdentity::DEFAULT`](crate::ble::identity::DeviceIdentity::DEFAULT);
//! the runtime identity can be replaced later through `ble::identity`.

// Device identity

/// Configured device name buffer.
///
/// The full-name record declares its length from the bytes before the first
/// NUL but copies the whole buffer, so trailing padding here is visible in
/// the output past the written length.
pub const DEVICE_NAME: &[u8] = b"ES32W3120";

/// GAP appearance (0x0340 = Generic Sensor).
pub const DEVICE_APPEARANCE: u16 = 0x0340;

/// Public device address, little-endian as sent over the air.
pub const DEVICE_PUBLIC_ADDR: [u8; 6] = [0x20, 0x31, 0x33, 0x57, 0x32, 0x45];

/// Static random device address (two MSBs set), little-endian.
pub const DEVICE_RANDOM_ADDR: [u8; 6] = [0x01, 0x31, 0x33, 0x57, 0x32, 0xC5];

/// Advertise the static random address instead of the public one.
pub const DEVICE_USE_RANDOM_ADDR: bool = false;

// Advertising payloads

/// Legacy advertising / scan response payload capacity.
pub const LEGACY_ADV_DATA_LEN: usize = 31;

/// Extended advertising payload capacity.
pub const EXTENDED_ADV_DATA_LEN: usize = 255;

/// Maximum number of advertising sets cached at once.
pub const MAX_ADV_SETS: usize = 4;

/// Largest AD value: the length byte counts the type byte, so 255 - 1.
pub const AD_VALUE_MAX_LEN: usize = 254;

// Connection parameters

/// Slave connection interval bounds (in 1.25 ms units).
/// 6 = 7.5 ms, 3200 = 4 s.
pub const CONN_INTERVAL_MIN: u16 = 6;
pub const CONN_INTERVAL_MAX: u16 = 3200;

// Scanning

/// Capacity of names extracted from received advertising data.
pub const SCAN_NAME_MAX_LEN: usize = 32;
