//! Advertising-set cache.
//!
//! Each advertising set keeps its encoded advertising data and scan
//! response so they can be (re)loaded into the controller without
//! re-encoding. Updates are encoded into a scratch buffer of the set's
//! payload capacity and committed only on success, so a failed update
//! leaves the previously cached payload untouched.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::ble::advdata::{AdvDataDescriptor, AdvDataEncoder};
use crate::ble::identity::DeviceIdentity;
use crate::config::{EXTENDED_ADV_DATA_LEN, LEGACY_ADV_DATA_LEN, MAX_ADV_SETS};
use crate::error::{Error, Result};

/// Advertising PDU family, which bounds the payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvPayloadKind {
    /// Legacy advertising, 31-byte payloads.
    Legacy,
    /// Extended advertising, 255-byte payloads.
    Extended,
}

impl AdvPayloadKind {
    pub const fn capacity(self) -> usize {
        match self {
            AdvPayloadKind::Legacy => LEGACY_ADV_DATA_LEN,
            AdvPayloadKind::Extended => EXTENDED_ADV_DATA_LEN,
        }
    }
}

/// One advertising set and its cached payloads.
#[derive(Debug, Clone)]
pub struct AdvertisingSet {
    handle: u8,
    kind: AdvPayloadKind,
    adv_data: Vec<u8, EXTENDED_ADV_DATA_LEN>,
    scan_rsp: Vec<u8, EXTENDED_ADV_DATA_LEN>,
}

impl AdvertisingSet {
    pub const fn new(handle: u8, kind: AdvPayloadKind) -> Self {
        Self {
            handle,
            kind,
            adv_data: Vec::new(),
            scan_rsp: Vec::new(),
        }
    }

    pub fn handle(&self) -> u8 {
        self.handle
    }

    pub fn kind(&self) -> AdvPayloadKind {
        self.kind
    }

    /// Payload capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.kind.capacity()
    }

    /// Cached advertising data.
    pub fn adv_data(&self) -> &[u8] {
        &self.adv_data
    }

    /// Cached scan response data.
    pub fn scan_rsp_data(&self) -> &[u8] {
        &self.scan_rsp
    }

    /// Encode and cache the advertising data.
    pub fn set_adv_data(
        &mut self,
        desc: &AdvDataDescriptor<'_>,
        identity: &DeviceIdentity,
    ) -> Result<usize> {
        let capacity = self.capacity();
        let handle = self.handle;
        encode_into(&mut self.adv_data, capacity, desc, identity)
            .inspect(|len| debug!("adv set {}: {} bytes adv data", handle, len))
            .inspect_err(|e| warn!("adv set {}: adv data rejected: {}", handle, e))
    }

    /// Encode and cache the scan response data.
    pub fn set_scan_rsp_data(
        &mut self,
        desc: &AdvDataDescriptor<'_>,
        identity: &DeviceIdentity,
    ) -> Result<usize> {
        let capacity = self.capacity();
        let handle = self.handle;
        encode_into(&mut self.scan_rsp, capacity, desc, identity)
            .inspect(|len| debug!("adv set {}: {} bytes scan response", handle, len))
            .inspect_err(|e| warn!("adv set {}: scan response rejected: {}", handle, e))
    }

    /// Drop both cached payloads.
    pub fn clear(&mut self) {
        self.adv_data.clear();
        self.scan_rsp.clear();
    }
}

fn encode_into(
    cache: &mut Vec<u8, EXTENDED_ADV_DATA_LEN>,
    capacity: usize,
    desc: &AdvDataDescriptor<'_>,
    identity: &DeviceIdentity,
) -> Result<usize> {
    let mut scratch = [0u8; EXTENDED_ADV_DATA_LEN];
    let mut encoder = AdvDataEncoder::new(&mut scratch[..capacity]);
    let len = encoder.encode(desc, identity)?;

    cache.clear();
    cache
        .extend_from_slice(&scratch[..len])
        .map_err(|_| Error::DataSizeExceeded)?;
    Ok(len)
}

/// Fixed-capacity table of advertising sets.
pub struct AdvSetTable {
    sets: Vec<AdvertisingSet, MAX_ADV_SETS>,
}

impl AdvSetTable {
    pub const fn new() -> Self {
        Self { sets: Vec::new() }
    }

    /// Allocate a set with the lowest free handle.
    pub fn create(&mut self, kind: AdvPayloadKind) -> Result<u8> {
        let handle = (0..MAX_ADV_SETS as u8)
            .find(|h| !self.sets.iter().any(|s| s.handle == *h))
            .ok_or(Error::NoFreeAdvSet)?;

        self.sets
            .push(AdvertisingSet::new(handle, kind))
            .map_err(|_| Error::NoFreeAdvSet)?;
        info!("Created adv set {} - now {} in use", handle, self.sets.len());
        Ok(handle)
    }

    pub fn get(&self, handle: u8) -> Option<&AdvertisingSet> {
        self.sets.iter().find(|s| s.handle == handle)
    }

    pub fn get_mut(&mut self, handle: u8) -> Option<&mut AdvertisingSet> {
        self.sets.iter_mut().find(|s| s.handle == handle)
    }

    /// Release a set and its cached payloads.
    pub fn remove(&mut self, handle: u8) -> Result<()> {
        let index = self
            .sets
            .iter()
            .position(|s| s.handle == handle)
            .ok_or(Error::UnknownAdvSet)?;
        self.sets.swap_remove(index);
        info!("Removed adv set {}", handle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl Default for AdvSetTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global advertising-set table (protected by a critical-section mutex).
pub static ADV_SETS: Mutex<CriticalSectionRawMutex, RefCell<AdvSetTable>> =
    Mutex::new(RefCell::new(AdvSetTable::new()));

/// Run `f` with exclusive access to the global table.
pub fn with_adv_sets<R>(f: impl FnOnce(&mut AdvSetTable) -> R) -> R {
    ADV_SETS.lock(|sets| f(&mut sets.borrow_mut()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::advdata::{ConnIntervalRange, NameType};

    fn name_only() -> AdvDataDescriptor<'static> {
        AdvDataDescriptor {
            name_type: NameType::Full,
            ..Default::default()
        }
    }

    #[test]
    fn payload_capacities() {
        assert_eq!(AdvPayloadKind::Legacy.capacity(), 31);
        assert_eq!(AdvPayloadKind::Extended.capacity(), 255);
    }

    #[test]
    fn set_adv_data_caches_encoded_bytes() {
        let mut set = AdvertisingSet::new(0, AdvPayloadKind::Legacy);
        let len = set
            .set_adv_data(&name_only(), &DeviceIdentity::DEFAULT)
            .unwrap();
        assert_eq!(len, 11);
        assert_eq!(&set.adv_data()[..2], &[0x0A, 0x09]);
        assert_eq!(&set.adv_data()[2..], b"ES32W3120");
        assert!(set.scan_rsp_data().is_empty());
    }

    #[test]
    fn failed_update_keeps_previous_payload() {
        let mut set = AdvertisingSet::new(1, AdvPayloadKind::Legacy);
        set.set_scan_rsp_data(&name_only(), &DeviceIdentity::DEFAULT)
            .unwrap();
        let before: Vec<u8, 31> = Vec::from_slice(set.scan_rsp_data()).unwrap();

        let bad = AdvDataDescriptor {
            include_appearance: true,
            slave_conn_intl: Some(ConnIntervalRange { min: 5, max: 10 }),
            ..Default::default()
        };
        assert_eq!(
            set.set_scan_rsp_data(&bad, &DeviceIdentity::DEFAULT),
            Err(Error::InvalidParameter)
        );
        assert_eq!(set.scan_rsp_data(), &before[..]);
    }

    #[test]
    fn legacy_set_rejects_extended_sized_payload() {
        let payload = [0xAB; 40];
        let desc = AdvDataDescriptor {
            man_data: Some(crate::ble::advdata::ManufacturerData {
                company_id: 0x0059,
                data: crate::ble::advdata::OpaqueData::new(&payload),
            }),
            ..Default::default()
        };

        let mut legacy = AdvertisingSet::new(0, AdvPayloadKind::Legacy);
        assert_eq!(
            legacy.set_adv_data(&desc, &DeviceIdentity::DEFAULT),
            Err(Error::DataSizeExceeded)
        );
        assert!(legacy.adv_data().is_empty());

        let mut extended = AdvertisingSet::new(1, AdvPayloadKind::Extended);
        assert_eq!(extended.set_adv_data(&desc, &DeviceIdentity::DEFAULT), Ok(44));
    }

    #[test]
    fn table_allocates_lowest_free_handle() {
        let mut table = AdvSetTable::new();
        assert_eq!(table.create(AdvPayloadKind::Legacy), Ok(0));
        assert_eq!(table.create(AdvPayloadKind::Extended), Ok(1));
        assert_eq!(table.create(AdvPayloadKind::Legacy), Ok(2));
        table.remove(1).unwrap();
        assert_eq!(table.create(AdvPayloadKind::Legacy), Ok(1));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn table_full_and_unknown_handles() {
        let mut table = AdvSetTable::new();
        for _ in 0..MAX_ADV_SETS {
            table.create(AdvPayloadKind::Legacy).unwrap();
        }
        assert_eq!(
            table.create(AdvPayloadKind::Legacy),
            Err(Error::NoFreeAdvSet)
        );
        assert_eq!(table.remove(42), Err(Error::UnknownAdvSet));
        assert!(table.get(42).is_none());
    }

    #[test]
    fn global_table_is_shared() {
        let handle = with_adv_sets(|sets| sets.create(AdvPayloadKind::Extended)).unwrap();
        with_adv_sets(|sets| {
            let set = sets.get_mut(handle).unwrap();
            set.set_adv_data(&name_only(), &DeviceIdentity::DEFAULT)
                .unwrap();
        });
        let cached = with_adv_sets(|sets| sets.get(handle).map(|s| s.adv_data().len()));
        assert_eq!(cached, Some(11));
        with_adv_sets(|sets| sets.remove(handle)).unwrap();
    }
}
