use crate::parser::ParserError;
use nom::number::{be_u16, be_u32};
use nom::{IResult, Parser};

// TCP Protocol
// RFC 9293: https://datatracker.ietf.org/doc/html/rfc9293

pub const MIN_HEADER_LENGTH: usize = 20;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], TCP<'_>> {
    // Source port. 2 bytes
    let (rest, port_source) = be_u16().parse(bytes)?;
    // Destination port. 2 bytes
    let (rest, port_destination) = be_u16().parse(rest)?;

    // Sequence number, 4 bytes
    let (rest, sequence_number) = be_u32().parse(rest)?;
    // Acknowledgement number, 4 bytes
    let (rest, acknowledgement_number) = be_u32().parse(rest)?;

    // Data Offset - 4 bits, Reserved - 4 bits, Flags - 8 bits
    let (rest, offset_flags) = be_u16().parse(rest)?;
    // Data Offset is stored in 32-bit words
    let data_offset = (offset_flags >> 12) * 4;
    let reserved = ((offset_flags >> 8) & 0x0F) as u8;
    let flags = Flags::from((offset_flags & 0x00FF) as u8);

    let header_length = data_offset as usize;
    if header_length < MIN_HEADER_LENGTH || header_length > bytes.len() {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }

    // Window: 2 bytes.
    let (rest, window) = be_u16().parse(rest)?;
    // Checksum: 2 bytes.
    let (rest, checksum) = be_u16().parse(rest)?;
    // Urgent pointer: 2 bytes.
    let (_, urgent_pointer) = be_u16().parse(rest)?;

    // Options are kept raw, up to 40 bytes.
    let options = bytes
        .get(MIN_HEADER_LENGTH..header_length)
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;
    let payload = bytes
        .get(header_length..)
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;

    let protocol = TCP {
        port_source,
        port_destination,
        sequence_number,
        acknowledgement_number,
        data_offset,
        reserved,
        flags,
        window,
        checksum,
        urgent_pointer,
        options,
        payload,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, PartialEq)]
pub struct TCP<'a> {
    pub port_source: u16,
    pub port_destination: u16,
    pub sequence_number: u32,
    pub acknowledgement_number: u32,
    /// In bytes.
    pub data_offset: u16,
    pub reserved: u8,
    pub flags: Flags,
    pub window: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
    pub options: &'a [u8],
    pub payload: &'a [u8],
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub congestion_window_reduced: bool,
    pub ecn_echo: bool,
    pub urgent: bool,
    pub acknowledgment: bool,
    pub push: bool,
    pub reset: bool,
    pub syn: bool,
    pub fin: bool,
}

impl Flags {
    /// First letters of the set flags in URG, ACK, PSH, RST, SYN, FIN order.
    ///
    /// SYN + ACK renders as `AS`, no flags as an empty string.
    pub fn label(&self) -> String {
        [
            (self.urgent, 'U'),
            (self.acknowledgment, 'A'),
            (self.push, 'P'),
            (self.reset, 'R'),
            (self.syn, 'S'),
            (self.fin, 'F'),
        ]
        .into_iter()
        .filter(|(is_set, _)| *is_set)
        .map(|(_, letter)| letter)
        .collect()
    }
}

impl From<u8> for Flags {
    fn from(value: u8) -> Self {
        let is_set = |mask: u8| value & mask != 0;

        Self {
            congestion_window_reduced: is_set(0b1000_0000),
            ecn_echo: is_set(0b0100_0000),
            urgent: is_set(0b0010_0000),
            acknowledgment: is_set(0b0001_0000),
            push: is_set(0b0000_1000),
            reset: is_set(0b0000_0100),
            syn: is_set(0b0000_0010),
            fin: is_set(0b0000_0001),
        }
    }
}
