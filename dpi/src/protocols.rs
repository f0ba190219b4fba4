use crate::protocols::ip::protocol::ProtocolName;
use strum_macros::Display;

/// Guide: How to Add a Protocol
/// 1. Add it to the `ProtocolId` enum.
/// 2. If the protocol is a root protocol, add a link to it in the `ProtocolId::root` method according to the linktype.
/// 3. Place the parsing method in your module, e.g., `protocols::custom_protocol::parse`.
/// 4. For a transport protocol, add a variant to `IpNextLevelProtocol` and to `Transport`, then dispatch to it in `parser::decode`.
///
/// That's it! After that, write tests and verify that parsing works correctly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum ProtocolId {
    Ethernet,

    IPv4,

    ICMPv4,
    TCP,
    UDP,
}

impl ProtocolId {
    pub fn root(link_type: &pcap::Linktype) -> Option<Self> {
        match link_type {
            pcap::Linktype(1) => Some(Self::Ethernet),
            _ => None,
        }
    }
}

/// One decoded frame. Borrows the capture buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet<'a> {
    pub ethernet: ethernet::Ethernet,
    pub ipv4: ipv4::IPv4<'a>,
    pub transport: Option<Transport<'a>>,
}

impl<'a> Packet<'a> {
    pub fn protocol(&self) -> ProtocolName {
        self.ipv4.protocol()
    }

    pub fn ports(&self) -> Option<(u16, u16)> {
        self.transport.as_ref().and_then(Transport::ports)
    }

    /// Transport payload, if there is a transport header at all.
    pub fn payload(&self) -> Option<&'a [u8]> {
        self.transport.as_ref().map(Transport::payload)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transport<'a> {
    ICMPv4(icmpv4::ICMPv4<'a>),
    TCP(tcp::TCP<'a>),
    UDP(udp::UDP<'a>),
}

impl<'a> Transport<'a> {
    /// Source and destination ports. ICMP has none.
    pub fn ports(&self) -> Option<(u16, u16)> {
        match self {
            Self::ICMPv4(_) => None,
            Self::TCP(value) => Some((value.port_source, value.port_destination)),
            Self::UDP(value) => Some((value.port_source, value.port_destination)),
        }
    }

    pub fn payload(&self) -> &'a [u8] {
        match self {
            Self::ICMPv4(value) => value.payload,
            Self::TCP(value) => value.payload,
            Self::UDP(value) => value.payload,
        }
    }
}

pub mod ethernet;
pub mod icmpv4;
pub mod ip {
    pub mod protocol;
}
pub mod ipv4;
pub mod tcp;
pub mod udp;
