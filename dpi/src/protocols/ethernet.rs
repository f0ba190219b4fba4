use crate::parser::ParserError;
use crate::protocols::ethernet::ether_type::EtherType;
use crate::protocols::ethernet::mac::MacAddress;
use nom::IResult;
use thiserror::Error;

// Ethernet II
// IEEE 802.3: https://standards.ieee.org/ieee/802.3/10422/

pub const HEADER_LENGTH: usize = 14;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], Ethernet> {
    if bytes.len() < HEADER_LENGTH {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }

    // Destination MAC. 6 bytes
    let (rest, destination_mac) = mac::parse(bytes)?;
    // Source MAC. 6 bytes
    let (rest, source_mac) = mac::parse(rest)?;
    // EtherType. 2 bytes
    let (rest, ether_type) = ether_type::parse(rest)?;

    let protocol = Ethernet {
        destination_mac,
        source_mac,
        ether_type,
    };

    Ok((rest, protocol))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ethernet {
    pub destination_mac: MacAddress,
    pub source_mac: MacAddress,
    pub ether_type: EtherType,
}

#[derive(Debug, Error)]
pub enum EthernetError {
    #[error("Failed to decode hex MAC address.")]
    MacFailedHexDecode,

    #[error("MAC address must be 6 bytes long.")]
    MacInvalidBytesLength,

    #[error("MAC address string has a wrong length.")]
    MacInvalidStringLength,
}

pub mod ether_type;
pub mod mac;
