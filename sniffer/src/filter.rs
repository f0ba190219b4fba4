use crate::config::Config;
use dpi::protocols::Transport;
use dpi::protocols::ip::protocol::{IpNextLevelProtocol, ProtocolName};
use dpi::protocols::ipv4::IPv4;
use std::net::Ipv4Addr;

/// Acceptance predicate of a session. Every configured criterion must hold,
/// criteria left unset accept everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    pub protocol: Option<IpNextLevelProtocol>,
    pub port: Option<u16>,
    pub host: Option<Ipv4Addr>,
}

impl FilterCriteria {
    pub fn matches(&self, ipv4: &IPv4, transport: Option<&Transport>) -> bool {
        if let Some(protocol) = self.protocol
            && ipv4.protocol() != ProtocolName::Known(protocol)
        {
            return false;
        }

        if let Some(host) = self.host
            && ipv4.address_source != host
            && ipv4.address_destination != host
        {
            return false;
        }

        if let Some(port) = self.port {
            // No ports to compare: ICMP and unknown protocols are rejected.
            match transport.and_then(Transport::ports) {
                Some((source, destination)) if source == port || destination == port => {},
                _ => return false,
            }
        }

        true
    }

    pub fn is_empty(&self) -> bool {
        self.protocol.is_none() && self.port.is_none() && self.host.is_none()
    }
}

impl From<&Config> for FilterCriteria {
    fn from(config: &Config) -> Self {
        Self {
            protocol: config.protocol_filter,
            port: config.port_filter,
            host: config.host_filter,
        }
    }
}

impl std::fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(protocol) = self.protocol {
            parts.push(format!("protocol {}", protocol));
        }
        if let Some(host) = self.host {
            parts.push(format!("host {}", host));
        }
        if let Some(port) = self.port {
            parts.push(format!("port {}", port));
        }

        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
