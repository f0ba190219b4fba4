use crate::parser::ParserError;
use nom::IResult;
use nom::Parser;
use nom::number::{be_u8, be_u16};
use num_enum::TryFromPrimitive;

// ICMPv4 Protocol
// RFC 792: https://datatracker.ietf.org/doc/html/rfc792

pub const HEADER_LENGTH: usize = 4;
pub const UNKNOWN_TYPE_NAME: &str = "Unknown";

pub fn parse(bytes: &[u8]) -> IResult<&[u8], ICMPv4<'_>> {
    if bytes.len() < HEADER_LENGTH {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }

    // Message type. 1 byte
    let (rest, message_type) = be_u8().parse(bytes)?;

    // Code. 1 byte
    let (rest, code) = be_u8().parse(rest)?;

    // Checksum. 2 bytes
    let (payload, checksum) = be_u16().parse(rest)?;

    let protocol = ICMPv4 {
        message_type,
        code,
        checksum,
        payload,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, PartialEq)]
pub struct ICMPv4<'a> {
    pub message_type: u8,
    pub code: u8,
    pub checksum: u16,
    /// Rest of the header and data, depending on type & code.
    pub payload: &'a [u8],
}

impl ICMPv4<'_> {
    pub fn message_type_name(&self) -> &'static str {
        match MessageType::try_from(self.message_type) {
            Ok(message_type) => message_type.name(),
            Err(_) => UNKNOWN_TYPE_NAME,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum MessageType {
    EchoReply = 0,
    DestinationUnreachable = 3,
    SourceQuench = 4,
    Redirect = 5,
    EchoRequest = 8,
    TimeExceeded = 11,
    ParameterProblem = 12,
    TimestampRequest = 13,
    TimestampReply = 14,
}

impl MessageType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EchoReply => "Echo Reply",
            Self::DestinationUnreachable => "Destination Unreachable",
            Self::SourceQuench => "Source Quench",
            Self::Redirect => "Redirect",
            Self::EchoRequest => "Echo Request",
            Self::TimeExceeded => "Time Exceeded",
            Self::ParameterProblem => "Parameter Problem",
            Self::TimestampRequest => "Timestamp Request",
            Self::TimestampReply => "Timestamp Reply",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode;
    use crate::parser::tests::frame;
    use crate::protocols::Transport;
    use std::net::Ipv4Addr;

    #[test]
    fn test_icmpv4() {
        let bytes = frame(
            "00 1A 8C 10 AD 30 00 1E 68 51 4F A9 08 00 45 00 00 3C 7E 74 00 00 20 01 EB DF \
             AC 10 FF 01 43 D7 41 84 08 00 40 08 00 01 0F 55 41 42 43 44 45 46 47 48 49 4A \
             4B 4C 4D 4E 4F 50 51 52 53 54 55 56 57 41 42 43 44 45 46 47 48 49",
        );

        let packet = decode(&bytes).unwrap();
        assert_eq!(packet.ipv4.address_source, Ipv4Addr::new(172, 16, 255, 1));
        assert_eq!(packet.ipv4.address_destination, Ipv4Addr::new(67, 215, 65, 132));
        assert_eq!(packet.ports(), None);

        let actual = match packet.transport {
            Some(Transport::ICMPv4(value)) => value,
            _ => panic!(),
        };

        assert_eq!(actual.message_type, 8);
        assert_eq!(actual.code, 0);
        assert_eq!(actual.checksum, 0x4008);
        assert_eq!(actual.message_type_name(), "Echo Request");
        assert_eq!(actual.payload.len(), 36);
        assert_eq!(&actual.payload[..4], &[0x00, 0x01, 0x0F, 0x55]);
    }

    #[test]
    fn test_type_names() {
        let (_, reply) = parse(&[0x00, 0x00, 0xFF, 0xFF]).unwrap();
        assert_eq!(reply.message_type_name(), "Echo Reply");

        let (_, unlisted) = parse(&[30, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(unlisted.message_type_name(), "Unknown");

        let (_, exceeded) = parse(&[11, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(exceeded.message_type_name(), "Time Exceeded");
        assert_eq!(exceeded.code, 1);
    }

    #[test]
    fn test_header_too_short() {
        assert!(parse(&[0x08, 0x00, 0x40]).is_err());
    }
}
