use crate::stats::CaptureStats;
use chrono::NaiveTime;
use dpi::analysis::ports;
use dpi::analysis::ports::PortServiceTable;
use dpi::protocols::{Packet, Transport};
use std::io::Write;

pub mod hexdump;

const WIDTH_PROTOCOL: usize = 5;
const WIDTH_ADDRESS: usize = 15;
const WIDTH_PORT: usize = 12;
const RULE_WIDTH: usize = 80;
const INDENT: &str = "        ";

/// Text produced for one accepted packet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedPacket {
    pub line: String,
    pub details: Option<String>,
    pub hexdump: Option<String>,
}

pub trait PacketSink {
    fn packet(&mut self, packet: &RenderedPacket);

    fn report(&mut self, report: &str);
}

pub struct Presenter {
    services: PortServiceTable,
    hexdump: bool,
    verbose: bool,
}

impl Presenter {
    pub fn new(services: PortServiceTable, hexdump: bool, verbose: bool) -> Self {
        Self {
            services,
            hexdump,
            verbose,
        }
    }

    pub fn render(&self, timestamp: NaiveTime, packet: &Packet) -> RenderedPacket {
        let details = match self.verbose {
            true => Some(details(packet)),
            false => None,
        };

        let hexdump = match (self.hexdump, packet.payload()) {
            (true, Some(payload)) if !payload.is_empty() => Some(hexdump::render(payload)),
            _ => None,
        };

        RenderedPacket {
            line: self.line(timestamp, packet),
            details,
            hexdump,
        }
    }

    fn line(&self, timestamp: NaiveTime, packet: &Packet) -> String {
        let mut line = format!(
            "[{}] {:<WIDTH_PROTOCOL$} | {:<WIDTH_ADDRESS$}",
            timestamp.format("%H:%M:%S%.3f"),
            packet.protocol().to_string(),
            packet.ipv4.address_source.to_string(),
        );
        let destination = packet.ipv4.address_destination.to_string();

        match &packet.transport {
            Some(Transport::TCP(tcp)) => {
                line.push_str(&self.ports(
                    "tcp",
                    tcp.port_source,
                    &destination,
                    tcp.port_destination,
                ));

                let flags = tcp.flags.label();
                if !flags.is_empty() {
                    line.push_str(&format!(" [{}]", flags));
                }
            },
            Some(Transport::UDP(udp)) => {
                line.push_str(&self.ports(
                    "udp",
                    udp.port_source,
                    &destination,
                    udp.port_destination,
                ));
            },
            Some(Transport::ICMPv4(icmp)) => {
                line.push_str(&format!(
                    "{:WIDTH_PORT$}  -> {:<WIDTH_ADDRESS$} {}",
                    "",
                    destination,
                    icmp.message_type_name()
                ));
            },
            None => {
                line.push_str(&format!(
                    "{:WIDTH_PORT$}  -> {:<WIDTH_ADDRESS$}",
                    "", destination
                ));
            },
        }

        line
    }

    fn ports(&self, transport: &str, source: u16, destination: &str, port: u16) -> String {
        format!(
            ":{:<WIDTH_PORT$} -> {:<WIDTH_ADDRESS$}:{:<WIDTH_PORT$}",
            self.annotate(transport, source),
            destination,
            self.annotate(transport, port),
        )
    }

    fn annotate(&self, transport: &str, port: u16) -> String {
        match ports::service_name(&self.services, port, transport) {
            Some(service) => format!("{}({})", port, service),
            None => port.to_string(),
        }
    }
}

fn details(packet: &Packet) -> String {
    let ipv4 = &packet.ipv4;
    let destination = &packet.ethernet.destination_mac;
    let scope = if destination.is_broadcast() {
        " (broadcast)"
    } else if destination.is_multicast() {
        " (multicast)"
    } else {
        ""
    };

    let mut details = format!(
        "MAC {} -> {}{} | TTL {} | IHL {} | Checksum 0x{:04x}",
        packet.ethernet.source_mac,
        destination,
        scope,
        ipv4.time_to_live,
        ipv4.internet_header_length,
        ipv4.checksum,
    );

    match &packet.transport {
        Some(Transport::TCP(tcp)) => details.push_str(&format!(
            " | Seq {} | Ack {} | Window {}",
            tcp.sequence_number, tcp.acknowledgement_number, tcp.window
        )),
        Some(Transport::UDP(udp)) => details.push_str(&format!(" | Length {}", udp.length)),
        Some(Transport::ICMPv4(icmp)) => details.push_str(&format!(
            " | Type {} | Code {} | ICMP Checksum 0x{:04x}",
            icmp.message_type, icmp.code, icmp.checksum
        )),
        None => {},
    }

    details
}

pub fn format_report(stats: &CaptureStats) -> String {
    let mut report = format!(
        "\n{}\nCapture Statistics:\n    Total Packets: {}\n    Protocol Breakdown:",
        "=".repeat(RULE_WIDTH),
        stats.total()
    );

    for share in stats.breakdown() {
        report.push_str(&format!(
            "\n      {:<8}: {:>6} ({:.1}%)",
            share.name.to_string(),
            share.count,
            share.percentage
        ));
    }

    report
}

/// Writes packets and the report to stdout. Logs go to stderr.
#[derive(Default)]
pub struct StdoutSink;

impl StdoutSink {
    fn write(text: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", text) {
            log::warn!("Failed to write to stdout: {}", err);
        }
    }
}

impl PacketSink for StdoutSink {
    fn packet(&mut self, packet: &RenderedPacket) {
        let mut text = packet.line.clone();
        for block in [&packet.details, &packet.hexdump].into_iter().flatten() {
            for line in block.lines() {
                text.push('\n');
                text.push_str(INDENT);
                text.push_str(line);
            }
        }

        Self::write(&text);
    }

    fn report(&mut self, report: &str) {
        Self::write(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{icmp_frame, ipv4_frame, tcp_frame, udp_frame};
    use dpi::parser::decode;
    use dpi::protocols::ip::protocol::{IpNextLevelProtocol, ProtocolName};

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_milli_opt(12, 0, 0, 7).unwrap()
    }

    fn presenter(hexdump: bool, verbose: bool) -> Presenter {
        Presenter::new(ports::well_known(), hexdump, verbose)
    }

    #[test]
    fn test_tcp_line() {
        let bytes = tcp_frame([10, 0, 0, 5], [10, 0, 0, 1], 51000, 443, 0x02, b"");
        let packet = decode(&bytes).unwrap();

        let rendered = presenter(false, false).render(noon(), &packet);

        assert_eq!(
            rendered.line,
            format!(
                "[12:00:00.007] TCP   | {:<15}:{:<12} -> {:<15}:{:<12} [S]",
                "10.0.0.5", "51000", "10.0.0.1", "443(HTTPS)"
            )
        );
        assert_eq!(rendered.details, None);
        assert_eq!(rendered.hexdump, None);
    }

    #[test]
    fn test_tcp_line_without_flags() {
        let bytes = tcp_frame([10, 0, 0, 5], [10, 0, 0, 1], 51000, 22, 0x00, b"");
        let packet = decode(&bytes).unwrap();

        let line = presenter(false, false).render(noon(), &packet).line;

        assert!(line.ends_with(&format!(":{:<12}", "22(SSH)")));
        assert!(!line.contains(" ["));
    }

    #[test]
    fn test_udp_line() {
        let bytes = udp_frame([192, 168, 1, 20], [8, 8, 8, 8], 40000, 53, b"\x00\x01");
        let packet = decode(&bytes).unwrap();

        let line = presenter(false, false).render(noon(), &packet).line;

        assert_eq!(
            line,
            format!(
                "[12:00:00.007] UDP   | {:<15}:{:<12} -> {:<15}:{:<12}",
                "192.168.1.20", "40000", "8.8.8.8", "53(DNS)"
            )
        );
    }

    #[test]
    fn test_icmp_line() {
        let bytes = icmp_frame([10, 0, 0, 5], [10, 0, 0, 1], 8, b"ping");
        let packet = decode(&bytes).unwrap();

        let line = presenter(false, false).render(noon(), &packet).line;

        assert_eq!(
            line,
            format!(
                "[12:00:00.007] ICMP  | {:<15}{:13} -> {:<15} Echo Request",
                "10.0.0.5", "", "10.0.0.1"
            )
        );
    }

    #[test]
    fn test_untyped_line() {
        let bytes = ipv4_frame([10, 0, 0, 5], [10, 0, 0, 1], 47, &[0; 8]);
        let packet = decode(&bytes).unwrap();
        assert_eq!(packet.protocol(), ProtocolName::Unknown(47));

        let line = presenter(false, false).render(noon(), &packet).line;

        assert_eq!(
            line,
            format!(
                "[12:00:00.007] Unknown(47) | {:<15}{:13} -> {:<15}",
                "10.0.0.5", "", "10.0.0.1"
            )
        );
    }

    #[test]
    fn test_hexdump_only_for_payload() {
        let with_payload = tcp_frame([10, 0, 0, 5], [10, 0, 0, 1], 51000, 80, 0x18, b"GET /");
        let packet = decode(&with_payload).unwrap();
        let rendered = presenter(true, false).render(noon(), &packet);
        assert_eq!(
            rendered.hexdump.as_deref(),
            Some(format!("0000: {:<48} GET /", "47 45 54 20 2f").as_str())
        );

        let empty = tcp_frame([10, 0, 0, 5], [10, 0, 0, 1], 51000, 80, 0x10, b"");
        let packet = decode(&empty).unwrap();
        assert_eq!(presenter(true, false).render(noon(), &packet).hexdump, None);
    }

    #[test]
    fn test_verbose_details() {
        let bytes = tcp_frame([10, 0, 0, 5], [10, 0, 0, 1], 51000, 443, 0x12, b"");
        let packet = decode(&bytes).unwrap();

        let details = presenter(false, true).render(noon(), &packet).details.unwrap();

        assert!(details.starts_with("MAC "));
        assert!(details.contains("TTL 64"));
        assert!(details.contains("IHL 20"));
        assert!(details.contains("Seq 1000 | Ack 0"));
    }

    #[test]
    fn test_verbose_destination_scope() {
        let unicast = udp_frame([10, 0, 0, 5], [10, 0, 0, 255], 68, 67, b"");
        let packet = decode(&unicast).unwrap();
        let details = presenter(false, true).render(noon(), &packet).details.unwrap();
        assert!(details.starts_with("MAC 00:11:22:33:44:55 -> 66:77:88:99:AA:BB | "));

        let mut broadcast = unicast.clone();
        broadcast[..6].copy_from_slice(&[0xFF; 6]);
        let packet = decode(&broadcast).unwrap();
        let details = presenter(false, true).render(noon(), &packet).details.unwrap();
        assert!(details.contains("-> FF:FF:FF:FF:FF:FF (broadcast) | "));

        let mut multicast = unicast.clone();
        multicast[..6].copy_from_slice(&[0x01, 0x00, 0x5E, 0x00, 0x00, 0xFB]);
        let packet = decode(&multicast).unwrap();
        let details = presenter(false, true).render(noon(), &packet).details.unwrap();
        assert!(details.contains("-> 01:00:5E:00:00:FB (multicast) | "));
    }

    #[test]
    fn test_report() {
        let mut stats = CaptureStats::default();
        stats.record(ProtocolName::Known(IpNextLevelProtocol::TCP));
        stats.record(ProtocolName::Known(IpNextLevelProtocol::TCP));
        stats.record(ProtocolName::Known(IpNextLevelProtocol::UDP));

        let report = format_report(&stats);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(80));
        assert_eq!(lines[2], "Capture Statistics:");
        assert_eq!(lines[3], "    Total Packets: 3");
        assert_eq!(lines[4], "    Protocol Breakdown:");
        assert_eq!(lines[5], "      TCP     :      2 (66.7%)");
        assert_eq!(lines[6], "      UDP     :      1 (33.3%)");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_empty_report() {
        let report = format_report(&CaptureStats::default());

        assert!(report.ends_with("    Total Packets: 0\n    Protocol Breakdown:"));
    }
}
