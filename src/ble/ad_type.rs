//! Bluetooth SIG assigned numbers for AD types.
//!
//! Only the types the encoder produces are named here, but any byte can be
//! wrapped with [`AdType::from_u8`] so received data with unknown types can
//! still be searched.

/// One AD type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdType(u8);

impl AdType {
    pub const FLAGS: AdType = AdType(0x01);
    pub const MORE_16_BIT_UUID: AdType = AdType(0x02);
    pub const COMPLETE_16_BIT_UUID_LIST: AdType = AdType(0x03);
    pub const MORE_32_BIT_UUID: AdType = AdType(0x04);
    pub const COMPLETE_32_BIT_UUID_LIST: AdType = AdType(0x05);
    pub const MORE_128_BIT_UUID: AdType = AdType(0x06);
    pub const COMPLETE_128_BIT_UUID_LIST: AdType = AdType(0x07);
    pub const SHORTENED_NAME: AdType = AdType(0x08);
    pub const COMPLETE_NAME: AdType = AdType(0x09);
    pub const TX_POWER: AdType = AdType(0x0A);
    pub const SLAVE_CONN_INTERVAL_RANGE: AdType = AdType(0x12);
    pub const REQUIRE_16_BIT_SERVICE_UUID: AdType = AdType(0x14);
    pub const REQUIRE_128_BIT_SERVICE_UUID: AdType = AdType(0x15);
    pub const SERVICE_DATA_16_BIT: AdType = AdType(0x16);
    pub const PUBLIC_TARGET_ADDRESS: AdType = AdType(0x17);
    pub const APPEARANCE: AdType = AdType(0x19);
    pub const LE_BLUETOOTH_DEVICE_ADDRESS: AdType = AdType(0x1B);
    pub const REQUIRE_32_BIT_SERVICE_UUID: AdType = AdType(0x1F);
    pub const SERVICE_DATA_32_BIT: AdType = AdType(0x20);
    pub const SERVICE_DATA_128_BIT: AdType = AdType(0x21);
    pub const MANUFACTURER_SPECIFIC_DATA: AdType = AdType(0xFF);

    pub const fn from_u8(value: u8) -> Self {
        AdType(value)
    }

    pub const fn to_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for AdType {
    fn from(value: u8) -> Self {
        AdType(value)
    }
}

impl From<AdType> for u8 {
    fn from(value: AdType) -> Self {
        value.0
    }
}

/// Bits of the Flags record.
pub mod flags {
    /// LE Limited Discoverable Mode.
    pub const LE_LIMITED_DISCOVERABLE: u8 = 0b0000_0001;
    /// LE General Discoverable Mode.
    pub const LE_GENERAL_DISCOVERABLE: u8 = 0b0000_0010;
    /// BR/EDR Not Supported.
    pub const BR_EDR_NOT_SUPPORTED: u8 = 0b0000_0100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_numbers_match_sig_values() {
        assert_eq!(AdType::FLAGS.to_u8(), 0x01);
        assert_eq!(AdType::TX_POWER.to_u8(), 0x0A);
        assert_eq!(AdType::SLAVE_CONN_INTERVAL_RANGE.to_u8(), 0x12);
        assert_eq!(AdType::APPEARANCE.to_u8(), 0x19);
        assert_eq!(AdType::LE_BLUETOOTH_DEVICE_ADDRESS.to_u8(), 0x1B);
        assert_eq!(AdType::REQUIRE_32_BIT_SERVICE_UUID.to_u8(), 0x1F);
        assert_eq!(AdType::SERVICE_DATA_128_BIT.to_u8(), 0x21);
        assert_eq!(AdType::MANUFACTURER_SPECIFIC_DATA.to_u8(), 0xFF);
    }

    #[test]
    fn unknown_types_round_trip_through_u8() {
        let t = AdType::from(0x3D);
        assert_eq!(u8::from(t), 0x3D);
    }
}
