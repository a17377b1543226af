//! Lookup of AD records in raw advertising / scan-response data.

use heapless::String;

use crate::ble::ad_type::AdType;
use crate::config::SCAN_NAME_MAX_LEN;

/// Smallest record that can carry a value: length, type, one value byte.
const AD_MIN_RECORD_LEN: usize = 3;

/// Find the first record of `ad_type` starting at or after `*offset`.
///
/// The scan always starts at byte 0 and steps by `length + 1`; `*offset`
/// only excludes records that start before it. On a match `*offset` is set
/// to the start of the value and its length is returned.
///
/// Returns 0 when the data is shorter than one record, when no record
/// matches, or when the matching record is empty or runs past the end.
/// Absent and malformed cannot be told apart.
pub fn search(data: &[u8], offset: &mut usize, ad_type: AdType) -> usize {
    if data.len() < AD_MIN_RECORD_LEN {
        return 0;
    }

    let mut i = 0;
    while i + 1 < data.len() {
        if i >= *offset && data[i + 1] == ad_type.to_u8() {
            let value_start = i + 2;
            let value_len = (data[i] as usize).saturating_sub(1);
            if value_len == 0 || value_start + value_len > data.len() {
                return 0;
            }
            *offset = value_start;
            return value_len;
        }
        i += data[i] as usize + 1;
    }
    0
}

/// Value of the first record of `ad_type`, or `None`.
pub fn decode(data: &[u8], ad_type: AdType) -> Option<&[u8]> {
    let mut offset = 0;
    match search(data, &mut offset, ad_type) {
        0 => None,
        len => Some(&data[offset..offset + len]),
    }
}

/// One AD record borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdStructure<'a> {
    pub ad_type: AdType,
    pub data: &'a [u8],
}

/// Iterator over well-formed records; stops at the first zero-length or
/// truncated one.
#[derive(Debug, Clone)]
pub struct AdStructures<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> AdStructures<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = AdStructure<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.data.get(self.pos)? as usize;
        if len == 0 || self.pos + len >= self.data.len() {
            self.pos = self.data.len();
            return None;
        }
        let record = AdStructure {
            ad_type: AdType::from_u8(self.data[self.pos + 1]),
            data: &self.data[self.pos + 2..self.pos + 1 + len],
        };
        self.pos += len + 1;
        Some(record)
    }
}

/// Check if raw advertisement data lists the given 16-bit service UUID
/// in an incomplete or complete 16-bit UUID list.
pub fn contains_service_uuid16(data: &[u8], uuid: u16) -> bool {
    let uuid_le = uuid.to_le_bytes();

    AdStructures::new(data)
        .filter(|ad| {
            ad.ad_type == AdType::MORE_16_BIT_UUID
                || ad.ad_type == AdType::COMPLETE_16_BIT_UUID_LIST
        })
        .any(|ad| ad.data.chunks_exact(2).any(|chunk| chunk == uuid_le))
}

/// Extract the local name from advertisement data, preferring the complete
/// name over the shortened one.
pub fn extract_device_name(data: &[u8]) -> String<SCAN_NAME_MAX_LEN> {
    let found =
        decode(data, AdType::COMPLETE_NAME).or_else(|| decode(data, AdType::SHORTENED_NAME));

    let mut name = String::new();
    match found {
        Some(name_bytes) => {
            for &b in name_bytes {
                if name.push(b as char).is_err() {
                    break;
                }
            }
        }
        None => {
            let _ = name.push_str("Unknown");
        }
    }
    name
}
