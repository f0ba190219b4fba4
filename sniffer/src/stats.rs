use dpi::protocols::ip::protocol::ProtocolName;
use std::collections::HashMap;

/// Running tally of accepted packets. Owned by the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureStats {
    protocols: HashMap<ProtocolName, u64>,
    total: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProtocolShare {
    pub name: ProtocolName,
    pub count: u64,
    pub percentage: f64,
}

impl CaptureStats {
    pub fn record(&mut self, name: ProtocolName) {
        *self.protocols.entry(name).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Nonzero protocols, most frequent first. Equal counts are ordered by name.
    pub fn breakdown(&self) -> Vec<ProtocolShare> {
        let mut shares: Vec<ProtocolShare> = self
            .protocols
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, count)| ProtocolShare {
                name: *name,
                count: *count,
                percentage: *count as f64 / self.total as f64 * 100.0,
            })
            .collect();

        shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpi::protocols::ip::protocol::IpNextLevelProtocol;

    const TCP: ProtocolName = ProtocolName::Known(IpNextLevelProtocol::TCP);
    const UDP: ProtocolName = ProtocolName::Known(IpNextLevelProtocol::UDP);
    const ICMP: ProtocolName = ProtocolName::Known(IpNextLevelProtocol::ICMP);

    #[test]
    fn test_empty() {
        let stats = CaptureStats::default();

        assert_eq!(stats.total(), 0);
        assert!(stats.breakdown().is_empty());
    }

    #[test]
    fn test_total_equals_sum_of_counts() {
        let mut stats = CaptureStats::default();
        for name in [TCP, UDP, TCP, ICMP, ProtocolName::Unknown(47), TCP, UDP] {
            stats.record(name);
        }

        let breakdown = stats.breakdown();
        let sum: u64 = breakdown.iter().map(|share| share.count).sum();
        assert_eq!(stats.total(), 7);
        assert_eq!(sum, stats.total());

        let percentages: f64 = breakdown.iter().map(|share| share.percentage).sum();
        assert!((percentages - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_order() {
        let mut stats = CaptureStats::default();
        for name in [UDP, ICMP, TCP, TCP, ICMP, TCP] {
            stats.record(name);
        }

        let breakdown = stats.breakdown();
        let names: Vec<String> = breakdown.iter().map(|share| share.name.to_string()).collect();
        assert_eq!(names, vec!["TCP", "ICMP", "UDP"]);
        assert_eq!(breakdown[0].count, 3);
        assert!((breakdown[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_are_deterministic() {
        let mut first = CaptureStats::default();
        first.record(UDP);
        first.record(TCP);

        let mut second = CaptureStats::default();
        second.record(TCP);
        second.record(UDP);

        assert_eq!(first.breakdown(), second.breakdown());
        assert_eq!(first.breakdown()[0].name, TCP);
    }
}
