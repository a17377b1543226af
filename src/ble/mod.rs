//! Bluetooth Low Energy advertising data.
//!
//! 1. **AD types** - Bluetooth SIG assigned numbers for AD records.
//! 2. **Encoder** - packs an [`advdata::AdvDataDescriptor`] into the
//!    `[length][type][value]` record format of advertising and scan
//!    response payloads.
//! 3. **Parser** - linear search / decode of one AD type in raw data,
//!    plus record iteration and scan-side helpers.
//! 4. **Identity** - the device name, appearance and address the encoder
//!    advertises.
//! 5. **Advertising sets** - per-set cache of encoded payloads.
//!
//! The BLE stack itself lives in firmware; nothing here talks to it.

pub mod ad_type;
pub mod adv_parser;
pub mod adv_set;
pub mod advdata;
pub mod identity;


pub use ad_type::AdType;
pub use adv_parser::{decode, search};
pub use advdata::{encode, AdvDataDescriptor, AdvDataEncoder};
pub use identity::DeviceIdentity;
