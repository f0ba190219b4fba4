use std::collections::HashMap;
use std::io;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct PortInfo {
    pub port: Port,
    pub service_name: String,
    /// Empty when the service is the same for every transport.
    pub transport_protocol: String,
    pub description: String,
}

pub type Port = u16;
pub type PortServiceTable = HashMap<Port, Vec<PortInfo>>;

const WELL_KNOWN: [(Port, &str); 39] = [
    (20, "FTP-DATA"),
    (21, "FTP"),
    (22, "SSH"),
    (23, "TELNET"),
    (25, "SMTP"),
    (53, "DNS"),
    (67, "DHCP"),
    (68, "DHCP"),
    (69, "TFTP"),
    (80, "HTTP"),
    (110, "POP3"),
    (119, "NNTP"),
    (123, "NTP"),
    (135, "RPC"),
    (137, "NETBIOS"),
    (138, "NETBIOS"),
    (139, "NETBIOS"),
    (143, "IMAP"),
    (161, "SNMP"),
    (162, "SNMP-TRAP"),
    (389, "LDAP"),
    (443, "HTTPS"),
    (445, "SMB"),
    (465, "SMTPS"),
    (514, "SYSLOG"),
    (587, "SMTP"),
    (636, "LDAPS"),
    (993, "IMAPS"),
    (995, "POP3S"),
    (1433, "MSSQL"),
    (1521, "ORACLE"),
    (3306, "MYSQL"),
    (3389, "RDP"),
    (5432, "POSTGRES"),
    (5900, "VNC"),
    (6379, "REDIS"),
    (8080, "HTTP-PROXY"),
    (8443, "HTTPS-ALT"),
    (27017, "MONGODB"),
];

/// Built-in short names for the most common services.
pub fn well_known() -> PortServiceTable {
    let mut map = PortServiceTable::with_capacity(WELL_KNOWN.len());
    for (port, service_name) in WELL_KNOWN {
        map.entry(port).or_default().push(PortInfo {
            port,
            service_name: service_name.to_string(),
            transport_protocol: String::new(),
            description: String::new(),
        });
    }

    map
}

/// Reads the IANA "Service Name and Transport Protocol Port Number Registry" CSV.
///
/// Records without a single numeric port (empty, ranges) are skipped.
pub fn read_database<P: AsRef<Path>>(path: P) -> io::Result<PortServiceTable> {
    let file = std::fs::File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().from_reader(io::BufReader::new(file));

    let mut map = PortServiceTable::new();

    const INDEX_SERVICE: usize = 0;
    const INDEX_PORT: usize = 1;
    const INDEX_TRANSPORT_PROTOCOL: usize = 2;
    const INDEX_DESCRIPTION: usize = 3;
    for result in reader.records() {
        let record = result?;

        let port = match record.get(INDEX_PORT) {
            Some(value) => match value.trim().parse::<Port>() {
                Ok(value) => value,
                Err(_) => continue,
            },
            None => continue,
        };

        let service_name = record.get(INDEX_SERVICE).unwrap_or_default().trim();
        if service_name.is_empty() {
            continue;
        }
        let transport_protocol = record.get(INDEX_TRANSPORT_PROTOCOL).unwrap_or_default();
        let description = record.get(INDEX_DESCRIPTION).unwrap_or_default();

        let port_info = PortInfo {
            port,
            service_name: service_name.to_string(),
            transport_protocol: transport_protocol.trim().to_string(),
            description: description.to_string(),
        };
        map.entry(port).or_default().push(port_info);
    }

    Ok(map)
}

/// Appends `other` after the entries already in `table`, so earlier entries win lookups.
pub fn merge(table: &mut PortServiceTable, other: PortServiceTable) {
    for (port, infos) in other {
        table.entry(port).or_default().extend(infos);
    }
}

/// Service name of the first entry matching the port and transport (`tcp`, `udp`).
pub fn service_name<'a>(
    table: &'a PortServiceTable, port: Port, transport_protocol: &str,
) -> Option<&'a str> {
    table
        .get(&port)?
        .iter()
        .find(|info| {
            info.transport_protocol.is_empty()
                || info
                    .transport_protocol
                    .eq_ignore_ascii_case(transport_protocol)
        })
        .map(|info| info.service_name.as_str())
}
