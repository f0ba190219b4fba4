use crate::parser::ParserError;
use crate::protocols::ip::protocol::ProtocolName;
use nom::IResult;
use nom::Parser;
use nom::number::{be_u8, be_u16};
use std::net::Ipv4Addr;

// IPv4 Protocol
// RFC 791: https://datatracker.ietf.org/doc/html/rfc791

pub const MIN_HEADER_LENGTH: usize = 20;

/// Checksum is kept as received. It is never recomputed.
pub fn parse(bytes: &[u8]) -> IResult<&[u8], IPv4<'_>> {
    // Version & IHL, 4 bits each. IHL is stored in 32-bit words.
    let version_ihl = *bytes
        .first()
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;
    let version = version_ihl >> 4;
    let internet_header_length = (version_ihl & 0x0F) * 4;

    let header_length = internet_header_length as usize;
    if header_length < MIN_HEADER_LENGTH {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }
    let (header, payload) = bytes
        .split_at_checked(header_length)
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;

    let (rest, _) = be_u8().parse(header)?;
    // DSCP - 6 bits, ECN - 2 bits
    let (rest, type_of_service) = be_u8().parse(rest)?;
    let differentiated_services_code_point = type_of_service >> 2;
    let explicit_congestion_notification = type_of_service & 0b11;

    // Total length. 2 bytes
    let (rest, total_length) = be_u16().parse(rest)?;
    // Identification. 2 bytes
    let (rest, identification) = be_u16().parse(rest)?;
    // Flags - 3 bits, Fragment offset - 13 bits
    let (rest, flags_fragment) = be_u16().parse(rest)?;
    let flags = (flags_fragment >> 13) as u8;
    let fragment_offset = flags_fragment & 0x1FFF;

    // TTL. 1 byte
    let (rest, time_to_live) = be_u8().parse(rest)?;
    // Protocol. 1 byte
    let (rest, protocol_number) = be_u8().parse(rest)?;
    // Header checksum. 2 bytes
    let (rest, checksum) = be_u16().parse(rest)?;

    let (rest, address_source) = address::parse(rest)?;
    let (options, address_destination) = address::parse(rest)?;

    let protocol = IPv4 {
        version,
        internet_header_length,
        differentiated_services_code_point,
        explicit_congestion_notification,
        total_length,
        identification,
        flags,
        fragment_offset,
        time_to_live,
        protocol_number,
        checksum,
        address_source,
        address_destination,
        options,
        payload,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, PartialEq)]
pub struct IPv4<'a> {
    pub version: u8,
    /// In bytes.
    pub internet_header_length: u8,
    pub differentiated_services_code_point: u8,
    pub explicit_congestion_notification: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub time_to_live: u8,
    pub protocol_number: u8,
    pub checksum: u16,
    pub address_source: Ipv4Addr,
    pub address_destination: Ipv4Addr,
    pub options: &'a [u8],
    /// Everything after the header up to the end of the frame, padding included.
    pub payload: &'a [u8],
}

impl IPv4<'_> {
    pub fn protocol(&self) -> ProtocolName {
        ProtocolName::from(self.protocol_number)
    }
}

pub mod address;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::frame;
    use crate::protocols::ip::protocol::IpNextLevelProtocol;

    #[test]
    fn test_ipv4_udp() {
        let bytes = frame(
            "45 00 00 32 6A 3D 00 00 01 11 AA 56 C0 A8 03 83 E0 00 00 FC D5 48 14 EB 00 1E \
             20 88 76 F2 00 00 00 01 00 00 00 00 00 00 04 77 70 61 64 00 00 01 00 01",
        );

        let (rest, actual) = parse(&bytes).unwrap();
        let expected = IPv4 {
            version: 4,
            internet_header_length: 20,
            differentiated_services_code_point: 0,
            explicit_congestion_notification: 0,
            total_length: 50,
            identification: 0x6a3d,
            flags: 0,
            fragment_offset: 0,
            time_to_live: 1,
            protocol_number: 17,
            checksum: 0xaa56,
            address_source: Ipv4Addr::new(192, 168, 3, 131),
            address_destination: Ipv4Addr::new(224, 0, 0, 252),
            options: &[],
            payload: &bytes[20..],
        };

        assert_eq!(actual, expected);
        assert_eq!(rest, &bytes[20..]);
        assert_eq!(
            actual.protocol(),
            ProtocolName::Known(IpNextLevelProtocol::UDP)
        );
    }

    #[test]
    fn test_ipv4_with_options() {
        // IHL = 6 words: 4 bytes of options (Router Alert)
        let bytes = frame(
            "46 C0 00 20 00 00 40 00 01 02 00 00 C0 A8 01 02 E0 00 00 16 94 04 00 00 \
             22 00 F9 02 00 00 00 01",
        );

        let (rest, actual) = parse(&bytes).unwrap();

        assert_eq!(actual.internet_header_length, 24);
        assert_eq!(actual.differentiated_services_code_point, 48);
        assert_eq!(actual.flags, 0b010);
        assert_eq!(actual.options, &[0x94, 0x04, 0x00, 0x00]);
        assert_eq!(actual.protocol().to_string(), "Unknown(2)");
        assert_eq!(rest.len(), 8);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse(&[]).is_err());
    }
}
