//! Advertising Data encoder.
//!
//! Serializes an [`AdvDataDescriptor`] into consecutive AD records:
//!
//! ```text
//! record := length:u8, type:u8, value:u8[length - 1]
//! ```
//!
//! Fields are written in a fixed order (address, appearance, flags,
//! TX power, the nine UUID lists, connection interval range, manufacturer
//! data, service data, name). Encoding stops at the first failing field;
//! records already written stay in the buffer and are not rolled back.

use crate::ble::ad_type::AdType;
use crate::ble::identity::DeviceIdentity;
use crate::config::{AD_VALUE_MAX_LEN, CONN_INTERVAL_MAX, CONN_INTERVAL_MIN};
use crate::error::{Error, Result};

/// Length byte + type byte.
const AD_HEADER_LEN: usize = 2;

/// Which form of the device name to advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NameType {
    /// No name record.
    #[default]
    None,
    /// Shortened name: the first `n` bytes of the name buffer.
    Short(u8),
    /// Complete name.
    Full,
}

/// Opaque bytes with a declared length.
///
/// `data: None` models a missing buffer; that is only valid when `len` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpaqueData<'a> {
    pub len: usize,
    pub data: Option<&'a [u8]>,
}

impl<'a> OpaqueData<'a> {
    /// Empty payload with no backing buffer.
    pub const EMPTY: OpaqueData<'static> = OpaqueData { len: 0, data: None };

    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            len: data.len(),
            data: Some(data),
        }
    }

    /// The declared bytes, or `InvalidParameter` when the backing buffer is
    /// missing or shorter than declared.
    pub fn bytes(&self) -> Result<&'a [u8]> {
        match self.data {
            None if self.len == 0 => Ok(&[]),
            None => Err(Error::InvalidParameter),
            Some(data) => data.get(..self.len).ok_or(Error::InvalidParameter),
        }
    }
}

/// A list of fixed-width UUIDs stored back to back, little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UuidList<'a> {
    /// Number of UUIDs in `uuids`.
    pub count: usize,
    pub uuids: Option<&'a [u8]>,
}

impl<'a> UuidList<'a> {
    pub const fn new(count: usize, uuids: &'a [u8]) -> Self {
        Self {
            count,
            uuids: Some(uuids),
        }
    }
}

/// Slave connection interval range, in 1.25 ms units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnIntervalRange {
    pub min: u16,
    pub max: u16,
}

impl ConnIntervalRange {
    /// Both bounds within [6, 3200] and `min <= max`.
    pub fn is_valid(&self) -> bool {
        let bounds = CONN_INTERVAL_MIN..=CONN_INTERVAL_MAX;
        bounds.contains(&self.min) && bounds.contains(&self.max) && self.min <= self.max
    }
}

/// Service UUID carried in a service-data record; its width selects the AD type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceUuid {
    Uuid16(u16),
    Uuid32(u32),
    /// Little-endian byte order, as sent over the air.
    Uuid128([u8; 16]),
}

impl ServiceUuid {
    fn ad_type(&self) -> AdType {
        match self {
            ServiceUuid::Uuid16(_) => AdType::SERVICE_DATA_16_BIT,
            ServiceUuid::Uuid32(_) => AdType::SERVICE_DATA_32_BIT,
            ServiceUuid::Uuid128(_) => AdType::SERVICE_DATA_128_BIT,
        }
    }

    fn width(&self) -> usize {
        match self {
            ServiceUuid::Uuid16(_) => 2,
            ServiceUuid::Uuid32(_) => 4,
            ServiceUuid::Uuid128(_) => 16,
        }
    }

    fn write_le(&self, out: &mut [u8]) {
        match self {
            ServiceUuid::Uuid16(uuid) => out.copy_from_slice(&uuid.to_le_bytes()),
            ServiceUuid::Uuid32(uuid) => out.copy_from_slice(&uuid.to_le_bytes()),
            ServiceUuid::Uuid128(uuid) => out.copy_from_slice(uuid),
        }
    }
}

/// One service-data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceData<'a> {
    pub uuid: ServiceUuid,
    pub data: OpaqueData<'a>,
}

/// Manufacturer-specific data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManufacturerData<'a> {
    /// Bluetooth SIG company identifier.
    pub company_id: u16,
    pub data: OpaqueData<'a>,
}

/// Everything that can go into one advertising or scan-response payload.
///
/// All fields are optional; `Default` encodes to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvDataDescriptor<'a> {
    pub name_type: NameType,
    pub include_appearance: bool,
    pub include_addr: bool,
    /// AD Flags byte, see [`crate::ble::ad_type::flags`].
    pub flags: Option<u8>,
    pub tx_power: Option<i8>,

    pub uuids_more_16: Option<UuidList<'a>>,
    pub uuids_complete_16: Option<UuidList<'a>>,
    pub uuids_solicited_16: Option<UuidList<'a>>,
    pub uuids_more_32: Option<UuidList<'a>>,
    pub uuids_complete_32: Option<UuidList<'a>>,
    pub uuids_solicited_32: Option<UuidList<'a>>,
    pub uuids_more_128: Option<UuidList<'a>>,
    pub uuids_complete_128: Option<UuidList<'a>>,
    pub uuids_solicited_128: Option<UuidList<'a>>,

    pub slave_conn_intl: Option<ConnIntervalRange>,
    pub man_data: Option<ManufacturerData<'a>>,
    pub svc_data: &'a [ServiceData<'a>],
}

/// Capacity-bounded, append-only AD record writer over a caller buffer.
pub struct AdvDataEncoder<'b> {
    buf: &'b mut [u8],
    max_size: usize,
    offset: usize,
}

impl<'b> AdvDataEncoder<'b> {
    /// Wrap `buf`; capacity is its length, capped at `u16::MAX`.
    pub fn new(buf: &'b mut [u8]) -> Self {
        let max_size = buf.len().min(u16::MAX as usize);
        Self {
            buf,
            max_size,
            offset: 0,
        }
    }

    /// Bytes written so far, including those of a failed encode.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Encode every populated field of `desc`, in order.
    ///
    /// Returns the total number of bytes in the buffer.
    pub fn encode(
        &mut self,
        desc: &AdvDataDescriptor<'_>,
        identity: &DeviceIdentity,
    ) -> Result<usize> {
        if desc.include_addr {
            self.device_addr(identity)?;
        }
        if desc.include_appearance {
            self.appearance(identity.appearance)?;
        }
        if let Some(flags) = desc.flags {
            self.flags(flags)?;
        }
        if let Some(tx_power) = desc.tx_power {
            self.tx_power(tx_power)?;
        }

        let uuid_lists = [
            (desc.uuids_more_16, AdType::MORE_16_BIT_UUID, 2),
            (desc.uuids_complete_16, AdType::COMPLETE_16_BIT_UUID_LIST, 2),
            (desc.uuids_solicited_16, AdType::REQUIRE_16_BIT_SERVICE_UUID, 2),
            (desc.uuids_more_32, AdType::MORE_32_BIT_UUID, 4),
            (desc.uuids_complete_32, AdType::COMPLETE_32_BIT_UUID_LIST, 4),
            (desc.uuids_solicited_32, AdType::REQUIRE_32_BIT_SERVICE_UUID, 4),
            (desc.uuids_more_128, AdType::MORE_128_BIT_UUID, 16),
            (desc.uuids_complete_128, AdType::COMPLETE_128_BIT_UUID_LIST, 16),
            (desc.uuids_solicited_128, AdType::REQUIRE_128_BIT_SERVICE_UUID, 16),
        ];
        for (list, ad_type, width) in uuid_lists {
            if let Some(list) = list {
                self.uuid_list(ad_type, width, &list)?;
            }
        }

        if let Some(range) = desc.slave_conn_intl {
            self.conn_interval_range(&range)?;
        }
        if let Some(man_data) = desc.man_data {
            self.manufacturer_data(&man_data)?;
        }
        for svc_data in desc.svc_data {
            self.service_data(svc_data)?;
        }

        match desc.name_type {
            NameType::None => {}
            NameType::Short(len) => self.short_name(identity, len as usize)?,
            NameType::Full => self.full_name(identity)?,
        }

        Ok(self.offset)
    }

    /// Reserve one record and return its value area.
    ///
    /// Writes the header and advances the cursor only when the whole record
    /// fits.
    fn record(&mut self, ad_type: AdType, value_len: usize) -> Result<&mut [u8]> {
        if value_len > AD_VALUE_MAX_LEN {
            return Err(Error::InvalidParameter);
        }
        let size = AD_HEADER_LEN + value_len;
        if self.offset + size > self.max_size {
            return Err(Error::DataSizeExceeded);
        }

        let start = self.offset;
        self.buf[start] = (value_len + 1) as u8;
        self.buf[start + 1] = ad_type.to_u8();
        self.offset += size;
        Ok(&mut self.buf[start + AD_HEADER_LEN..start + size])
    }

    fn device_addr(&mut self, identity: &DeviceIdentity) -> Result<()> {
        let (addr, addr_type) = identity.address();
        let value = self.record(AdType::LE_BLUETOOTH_DEVICE_ADDRESS, 7)?;
        value[..6].copy_from_slice(&addr);
        value[6] = addr_type as u8;
        Ok(())
    }

    fn appearance(&mut self, appearance: u16) -> Result<()> {
        let value = self.record(AdType::APPEARANCE, 2)?;
        value.copy_from_slice(&appearance.to_le_bytes());
        Ok(())
    }

    fn flags(&mut self, flags: u8) -> Result<()> {
        let value = self.record(AdType::FLAGS, 1)?;
        value[0] = flags;
        Ok(())
    }

    fn tx_power(&mut self, tx_power: i8) -> Result<()> {
        let value = self.record(AdType::TX_POWER, 1)?;
        value[0] = tx_power as u8;
        Ok(())
    }

    fn uuid_list(&mut self, ad_type: AdType, width: usize, list: &UuidList<'_>) -> Result<()> {
        let uuids = list.uuids.ok_or(Error::InvalidParameter)?;
        if list.count == 0 {
            return Ok(());
        }
        let len = list
            .count
            .checked_mul(width)
            .ok_or(Error::InvalidParameter)?;
        let src = uuids.get(..len).ok_or(Error::InvalidParameter)?;

        let value = self.record(ad_type, len)?;
        value.copy_from_slice(src);
        Ok(())
    }

    fn conn_interval_range(&mut self, range: &ConnIntervalRange) -> Result<()> {
        if !range.is_valid() {
            return Err(Error::InvalidParameter);
        }
        let value = self.record(AdType::SLAVE_CONN_INTERVAL_RANGE, 4)?;
        value[..2].copy_from_slice(&range.min.to_le_bytes());
        value[2..].copy_from_slice(&range.max.to_le_bytes());
        Ok(())
    }

    fn manufacturer_data(&mut self, man_data: &ManufacturerData<'_>) -> Result<()> {
        let data = man_data.data.bytes()?;
        let value = self.record(AdType::MANUFACTURER_SPECIFIC_DATA, 2 + data.len())?;
        value[..2].copy_from_slice(&man_data.company_id.to_le_bytes());
        value[2..].copy_from_slice(data);
        Ok(())
    }

    fn service_data(&mut self, svc_data: &ServiceData<'_>) -> Result<()> {
        let data = svc_data.data.bytes()?;
        let width = svc_data.uuid.width();
        let value = self.record(svc_data.uuid.ad_type(), width + data.len())?;
        svc_data.uuid.write_le(&mut value[..width]);
        value[width..].copy_from_slice(data);
        Ok(())
    }

    fn short_name(&mut self, identity: &DeviceIdentity, len: usize) -> Result<()> {
        if len == 0 || len > identity.name_max_len() {
            return Err(Error::InvalidParameter);
        }
        let value = self.record(AdType::SHORTENED_NAME, len)?;
        value.copy_from_slice(&identity.name[..len]);
        Ok(())
    }

    /// The record length is declared from the C-string length, but the whole
    /// name buffer is copied. Any bytes past the string spill beyond the
    /// record (clipped at the end of the buffer) and past the returned
    /// length. Suspect, kept as the firmware does it.
    fn full_name(&mut self, identity: &DeviceIdentity) -> Result<()> {
        let declared = identity.name_len();
        let start = self.offset + AD_HEADER_LEN;
        self.record(AdType::COMPLETE_NAME, declared)?;

        let end = (start + identity.name.len()).min(self.buf.len());
        self.buf[start..end].copy_from_slice(&identity.name[..end - start]);
        Ok(())
    }
}

/// Encode `desc` into `out`.
///
/// Returns the number of bytes written. On error `out` may already hold the
/// records encoded before the failing field.
pub fn encode(
    desc: &AdvDataDescriptor<'_>,
    identity: &DeviceIdentity,
    out: &mut [u8],
) -> Result<u16> {
    let mut encoder = AdvDataEncoder::new(out);
    let written = encoder.encode(desc, identity)?;
    Ok(written as u16)
}
