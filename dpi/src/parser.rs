use crate::protocols::ethernet::ether_type::EtherType;
use crate::protocols::ip::protocol::{IpNextLevelProtocol, ProtocolName};
use crate::protocols::{Packet, ProtocolId, Transport, ethernet, icmpv4, ipv4, tcp, udp};
use thiserror::Error;

/// Decoder bound to the link type of a capture.
pub struct ProtocolParser {
    link_type: pcap::Linktype,
}

impl ProtocolParser {
    /// `None` if frames of this link type can't be decoded.
    pub fn new(link_type: &pcap::Linktype) -> Option<Self> {
        match ProtocolId::root(link_type) {
            Some(ProtocolId::Ethernet) => Some(Self {
                link_type: *link_type,
            }),
            _ => None,
        }
    }

    pub fn link_type(&self) -> pcap::Linktype {
        self.link_type
    }

    pub fn process<'a>(&self, frame: &'a [u8]) -> Result<Packet<'a>, DecodeError> {
        decode(frame)
    }
}

/// Decodes an Ethernet frame down to the transport layer.
///
/// Link payloads other than IPv4 are rejected with `UnsupportedEtherType`.
/// Unknown IPv4 protocol numbers still produce a packet, just without a
/// transport header.
pub fn decode(frame: &[u8]) -> Result<Packet<'_>, DecodeError> {
    let (rest, ethernet) = ethernet::parse(frame)
        .map_err(|_| DecodeError::Malformed(ProtocolId::Ethernet))?;

    if ethernet.ether_type != EtherType::Ipv4 {
        return Err(DecodeError::UnsupportedEtherType(ethernet.ether_type));
    }

    let (rest, ipv4) =
        ipv4::parse(rest).map_err(|_| DecodeError::Malformed(ProtocolId::IPv4))?;

    let transport = match ipv4.protocol() {
        ProtocolName::Known(IpNextLevelProtocol::ICMP) => {
            let (_, icmp) =
                icmpv4::parse(rest).map_err(|_| DecodeError::Malformed(ProtocolId::ICMPv4))?;
            Some(Transport::ICMPv4(icmp))
        },
        ProtocolName::Known(IpNextLevelProtocol::TCP) => {
            let (_, tcp) =
                tcp::parse(rest).map_err(|_| DecodeError::Malformed(ProtocolId::TCP))?;
            Some(Transport::TCP(tcp))
        },
        ProtocolName::Known(IpNextLevelProtocol::UDP) => {
            let (_, udp) =
                udp::parse(rest).map_err(|_| DecodeError::Malformed(ProtocolId::UDP))?;
            Some(Transport::UDP(udp))
        },
        ProtocolName::Unknown(_) => None,
    };

    Ok(Packet {
        ethernet,
        ipv4,
        transport,
    })
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Malformed {0} header.")]
    Malformed(ProtocolId),

    #[error("Unsupported link payload type {0}.")]
    UnsupportedEtherType(EtherType),
}

pub enum ParserError {
    ErrorVerify,
    FailureVerify,
}

impl ParserError {
    pub fn to_nom<T>(&self, input: T) -> nom::Err<nom::error::Error<T>> {
        match self {
            Self::ErrorVerify => nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Verify,
            )),
            Self::FailureVerify => nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Verify,
            )),
        }
    }
}
