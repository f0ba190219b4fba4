use crate::capture::{CaptureError, CaptureSource, RawFrame};
use crate::net::interface;
use crate::net::interface::CaptureSettings;
use chrono::{DateTime, Utc};

/// Capture from a network interface through libpcap / Npcap.
pub struct LiveCapture {
    settings: CaptureSettings,
    capture: Option<pcap::Capture<pcap::Active>>,
}

impl LiveCapture {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            settings,
            capture: None,
        }
    }
}

impl CaptureSource for LiveCapture {
    fn open(&mut self) -> Result<(), CaptureError> {
        let device = match &self.settings.interface {
            Some(name) => interface::get_network_interface(name)?,
            None => interface::get_default_network_interface()?,
        };
        let name = interface::get_network_interface_name(&device);

        let capture = interface::get_capture(device, &self.settings)?;
        log::info!("Capturing on {}.", name);

        self.capture = Some(capture);
        Ok(())
    }

    fn link_type(&self) -> Result<pcap::Linktype, CaptureError> {
        match &self.capture {
            Some(capture) => Ok(capture.get_datalink()),
            None => Err(CaptureError::NotOpened),
        }
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame<'_>>, CaptureError> {
        let capture = self.capture.as_mut().ok_or(CaptureError::NotOpened)?;

        match capture.next_packet() {
            Ok(packet) => Ok(Some(RawFrame {
                timestamp: timestamp(packet.header),
                data: packet.data,
            })),
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(err) => Err(CaptureError::from_pcap(err)),
        }
    }

    fn close(&mut self) {
        let Some(mut capture) = self.capture.take() else {
            return;
        };

        match capture.stats() {
            Ok(stats) => log::info!(
                "Capture library counters: {} received, {} dropped, {} dropped by interface.",
                stats.received,
                stats.dropped,
                stats.if_dropped
            ),
            Err(err) => log::debug!("Capture counters are unavailable: {}", err),
        }
    }
}

fn timestamp(header: &pcap::PacketHeader) -> DateTime<Utc> {
    #[allow(clippy::useless_conversion)]
    let seconds = i64::from(header.ts.tv_sec);
    #[allow(clippy::useless_conversion)]
    let microseconds = i64::from(header.ts.tv_usec);
    let nanoseconds = u32::try_from(microseconds.saturating_mul(1_000)).unwrap_or(0);

    DateTime::from_timestamp(seconds, nanoseconds).unwrap_or_else(Utc::now)
}
