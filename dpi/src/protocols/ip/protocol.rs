use num_enum::TryFromPrimitive;
use std::fmt::Formatter;
use strum_macros::{Display, EnumString};

/// IPv4 payload protocols that have a decoder.
// https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, TryFromPrimitive,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum IpNextLevelProtocol {
    ICMP = 1,
    TCP = 6,
    UDP = 17,
}

/// Display name of an IPv4 protocol number: `ICMP`, `TCP`, `UDP` or `Unknown(N)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProtocolName {
    Known(IpNextLevelProtocol),
    Unknown(u8),
}

impl From<u8> for ProtocolName {
    fn from(value: u8) -> Self {
        match IpNextLevelProtocol::try_from(value) {
            Ok(protocol) => Self::Known(protocol),
            Err(_) => Self::Unknown(value),
        }
    }
}

impl std::fmt::Display for ProtocolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(protocol) => write!(f, "{}", protocol),
            Self::Unknown(number) => write!(f, "Unknown({})", number),
        }
    }
}
