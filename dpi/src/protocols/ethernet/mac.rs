use crate::parser::ParserError;
use crate::protocols::ethernet::EthernetError;
use nom::IResult;
use nom::Parser;
use nom::bytes::take;
use std::fmt::Formatter;

pub const LENGTH_BYTES: usize = 6;
pub const BROADCAST_MAC: [u8; LENGTH_BYTES] = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MacAddress(pub [u8; LENGTH_BYTES]);

impl MacAddress {
    pub fn is_broadcast(&self) -> bool {
        self.0.eq(&BROADCAST_MAC)
    }

    pub fn is_multicast(&self) -> bool {
        if self.is_broadcast() {
            return false;
        }

        self.0[0] & 0b00000001 == 1
    }
}

impl From<[u8; LENGTH_BYTES]> for MacAddress {
    fn from(value: [u8; LENGTH_BYTES]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for MacAddress {
    type Error = EthernetError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; LENGTH_BYTES]>::try_from(value)
            .map_err(|_| EthernetError::MacInvalidBytesLength)?;

        Ok(MacAddress(bytes))
    }
}

impl TryFrom<&str> for MacAddress {
    type Error = EthernetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let s = value.replace(":", "").replace(".", "").replace("-", "");
        let bytes = hex::decode(&s).map_err(|_| EthernetError::MacFailedHexDecode)?;
        let bytes = <[u8; LENGTH_BYTES]>::try_from(bytes)
            .map_err(|_| EthernetError::MacInvalidStringLength)?;

        Ok(Self(bytes))
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

pub fn parse(input: &[u8]) -> IResult<&[u8], MacAddress> {
    let (input, mac_bytes) = take(LENGTH_BYTES).parse(input)?;
    let mac = MacAddress::try_from(mac_bytes)
        .map_err(|_| ParserError::ErrorVerify.to_nom(input))?;

    Ok((input, mac))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_broadcast() {
        let mac = MacAddress([0xFF; LENGTH_BYTES]);
        assert!(mac.is_broadcast());
        assert!(!mac.is_multicast());
    }

    #[test]
    fn test_is_multicast() {
        let mac = MacAddress::try_from("01:00:5e:02:02:04").unwrap();
        assert!(mac.is_multicast());
    }

    #[test]
    fn test_is_unicast() {
        let mac = MacAddress::try_from("00-1A-2B-3C-4D-5E").unwrap();
        assert!(!mac.is_broadcast());
        assert!(!mac.is_multicast());
    }

    #[test]
    fn test_display() {
        let mac = MacAddress::from([0x00, 0x1a, 0x8c, 0x15, 0xf9, 0x80]);
        assert_eq!(mac.to_string(), "00:1A:8C:15:F9:80");
    }

    #[test]
    fn test_wrong_string_length() {
        assert!(MacAddress::try_from("00:1A:2B").is_err());
    }
}
