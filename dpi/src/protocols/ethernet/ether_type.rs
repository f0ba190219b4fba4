use nom::IResult;
use nom::Parser;
use nom::number::be_u16;
use std::fmt::Formatter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EtherType {
    Arp,
    ArpFrameRelay,
    ArpReverse,
    Ipv4,
    Ipv6,
    Lldp,
    Vlan,
    Other(u16),
}

impl From<u16> for EtherType {
    fn from(value: u16) -> Self {
        match value {
            0x0806 => Self::Arp,
            0x0808 => Self::ArpFrameRelay,
            0x8035 => Self::ArpReverse,
            0x0800 => Self::Ipv4,
            0x86DD => Self::Ipv6,
            0x88CC => Self::Lldp,
            0x8100 => Self::Vlan,
            _ => Self::Other(value),
        }
    }
}

impl std::fmt::Display for EtherType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arp => write!(f, "ARP"),
            Self::ArpFrameRelay => write!(f, "Frame Relay ARP"),
            Self::ArpReverse => write!(f, "RARP"),
            Self::Ipv4 => write!(f, "IPv4"),
            Self::Ipv6 => write!(f, "IPv6"),
            Self::Lldp => write!(f, "LLDP"),
            Self::Vlan => write!(f, "802.1Q"),
            Self::Other(value) => write!(f, "0x{:04X}", value),
        }
    }
}

pub fn parse(input: &[u8]) -> IResult<&[u8], EtherType> {
    let (input, ether_type) = be_u16().parse(input)?;

    Ok((input, EtherType::from(ether_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_byte_order() {
        let (_, actual) = parse(&[0x08, 0x00]).unwrap();
        assert_eq!(actual, EtherType::Ipv4);
        assert_eq!(actual.to_string(), "IPv4");
    }

    #[test]
    fn test_other() {
        let (_, actual) = parse(&[0x88, 0x8E]).unwrap();
        assert_eq!(actual, EtherType::Other(0x888E));
        assert_eq!(actual.to_string(), "0x888E");
    }
}
