use crate::parser::ParserError;
use nom::IResult;
use nom::Parser;
use nom::number::be_u16;

// UDP Protocol
// RFC 768: https://datatracker.ietf.org/doc/html/rfc768

pub const HEADER_LENGTH: usize = 8;

/// `length` is reported as declared, it isn't checked against the buffer.
pub fn parse(bytes: &[u8]) -> IResult<&[u8], UDP<'_>> {
    if bytes.len() < HEADER_LENGTH {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }

    // Source port. 2 bytes
    let (rest, port_source) = be_u16().parse(bytes)?;
    // Destination port. 2 bytes
    let (rest, port_destination) = be_u16().parse(rest)?;
    // Length. 2 bytes
    let (rest, length) = be_u16().parse(rest)?;
    // Checksum. 2 bytes
    let (payload, checksum) = be_u16().parse(rest)?;

    let protocol = UDP {
        port_source,
        port_destination,
        length,
        checksum,
        payload,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, PartialEq)]
pub struct UDP<'a> {
    pub port_source: u16,
    pub port_destination: u16,
    pub length: u16,
    pub checksum: u16,
    pub payload: &'a [u8],
}
