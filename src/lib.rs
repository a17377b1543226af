//! BLE Advertising Data codec for the ES32W3120.
//!
//! Encodes advertising / scan-response payloads from a structured
//! descriptor, looks up AD records in raw data, and caches encoded
//! payloads per advertising set.
//!
//! The crate is `no_std` and allocation-free; the same code runs on the
//! target and on the host for tests (`cargo test`).
//!
//! Enable the `defmt` feature for on-target logging, and `embedded` to pull
//! in the single-core critical-section implementation for Cortex-M.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod ble;
pub mod config;
pub mod error;

pub use error::{Error, Result};
