use chrono::{DateTime, Utc};
use thiserror::Error;

/// One link-layer frame as received. Lives until the next receive call.
#[derive(Clone, Copy, Debug)]
pub struct RawFrame<'a> {
    pub timestamp: DateTime<Utc>,
    pub data: &'a [u8],
}

pub trait CaptureSource {
    fn open(&mut self) -> Result<(), CaptureError>;

    fn link_type(&self) -> Result<pcap::Linktype, CaptureError>;

    /// Blocks for at most the read timeout. `Ok(None)` - no traffic in the meantime.
    fn next_frame(&mut self) -> Result<Option<RawFrame<'_>>, CaptureError>;

    fn close(&mut self);
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Insufficient privileges to capture packets.")]
    PermissionDenied(String),

    #[error("Packet capture is not supported on this platform.")]
    UnsupportedPlatform(String),

    #[error("Interface error.")]
    Interface(crate::net::interface::InterfaceError),

    #[error("Capture source is not opened.")]
    NotOpened,

    #[error("Pcap Library error.")]
    Pcap(pcap::Error),
}

impl CaptureError {
    /// Sorts pcap failures into the ones that need a distinct remedy.
    pub fn from_pcap(err: pcap::Error) -> Self {
        let message = err.to_string();
        let lowercase = message.to_lowercase();

        let is_permission = matches!(
            err,
            pcap::Error::IoError(std::io::ErrorKind::PermissionDenied)
        ) || lowercase.contains("permission")
            || lowercase.contains("not permitted");
        if is_permission {
            return Self::PermissionDenied(message);
        }

        let is_unsupported =
            matches!(err, pcap::Error::IoError(std::io::ErrorKind::Unsupported))
                || lowercase.contains("not supported");
        if is_unsupported {
            return Self::UnsupportedPlatform(message);
        }

        Self::Pcap(err)
    }

    pub fn additional_info(&self) -> Option<String> {
        match self {
            CaptureError::PermissionDenied(message) => Some(format!(
                "{message}. Run as root or grant CAP_NET_RAW to the binary"
            )),
            CaptureError::UnsupportedPlatform(message) => Some(message.clone()),
            CaptureError::Interface(err) => Some(err.to_string()),
            CaptureError::Pcap(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

impl From<crate::net::interface::InterfaceError> for CaptureError {
    fn from(err: crate::net::interface::InterfaceError) -> Self {
        match err {
            crate::net::interface::InterfaceError::PcapError(err) => Self::from_pcap(err),
            other => Self::Interface(other),
        }
    }
}

pub mod live;
