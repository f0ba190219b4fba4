use crate::capture::{CaptureError, CaptureSource};
use crate::filter::FilterCriteria;
use crate::presentation;
use crate::presentation::{PacketSink, Presenter};
use crate::stats::CaptureStats;
use chrono::Local;
use dpi::parser::{DecodeError, ProtocolParser};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    CountLimit,
    TimeLimit,
    Cancelled,
    CaptureFailed,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::CountLimit => "packet count limit reached",
            Self::TimeLimit => "time limit reached",
            Self::Cancelled => "cancelled",
            Self::CaptureFailed => "capture failed",
        };
        write!(f, "{}", text)
    }
}

/// Stop conditions. Zero count or `None` time means unlimited.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionOptions {
    pub count_limit: u64,
    pub time_limit: Option<Duration>,
}

#[derive(Debug)]
pub struct SessionSummary {
    pub stop_reason: StopReason,
    pub stats: CaptureStats,
}

/// One bounded capture run: `Idle -> Running -> Stopping -> Stopped`.
///
/// Frames are processed strictly in arrival order on the calling thread.
/// Stop conditions are checked before every receive and again after every
/// decode, so a shutdown request arriving while a receive blocks is honored
/// before that frame is counted.
pub struct CaptureSession<S: CaptureSource, K: PacketSink> {
    source: S,
    sink: K,
    filter: FilterCriteria,
    presenter: Presenter,
    options: SessionOptions,
    shutdown: Arc<AtomicBool>,
}

impl<S: CaptureSource, K: PacketSink> CaptureSession<S, K> {
    pub fn new(
        source: S, sink: K, filter: FilterCriteria, presenter: Presenter,
        options: SessionOptions, shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            sink,
            filter,
            presenter,
            options,
            shutdown,
        }
    }

    pub fn run(self) -> Result<SessionSummary, SessionError> {
        let Self {
            mut source,
            mut sink,
            filter,
            presenter,
            options,
            shutdown,
        } = self;

        log::debug!("Session state: Idle -> Running.");

        if let Err(err) = source.open() {
            log::debug!("Session state: Running -> Stopped.");
            return Err(SessionError::Open(err));
        }

        let parser = match source.link_type() {
            Ok(link_type) => match ProtocolParser::new(&link_type) {
                Some(parser) => parser,
                None => {
                    source.close();
                    log::debug!("Session state: Running -> Stopped.");
                    return Err(SessionError::UnsupportedLinkType(link_type.0));
                },
            },
            Err(err) => {
                source.close();
                log::debug!("Session state: Running -> Stopped.");
                return Err(SessionError::Open(err));
            },
        };
        log::debug!("Decoding frames of link type {:?}.", parser.link_type());
        if filter.is_empty() {
            log::info!("Capture started without filters.");
        } else {
            log::info!("Capture started. Active filters: {}.", filter);
        }

        let mut stats = CaptureStats::default();
        let mut failure = None;
        let started = Instant::now();

        let stop_reason = loop {
            if let Some(reason) = checkpoint(&shutdown, &options, &stats, started) {
                break reason;
            }

            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(err) => {
                    log::error!("Capture source failed: {}", err);
                    failure = Some(err);
                    break StopReason::CaptureFailed;
                },
            };

            let packet = match parser.process(frame.data) {
                Ok(packet) => packet,
                Err(DecodeError::Malformed(protocol)) => {
                    log::debug!(
                        "Skipped a frame of {} bytes: malformed {} header.",
                        frame.data.len(),
                        protocol
                    );
                    continue;
                },
                Err(DecodeError::UnsupportedEtherType(ether_type)) => {
                    log::trace!("Skipped a frame with link payload type {}.", ether_type);
                    continue;
                },
            };

            // A shutdown or deadline observed during the receive drops this frame.
            if let Some(reason) = checkpoint(&shutdown, &options, &stats, started) {
                break reason;
            }

            if !filter.matches(&packet.ipv4, packet.transport.as_ref()) {
                log::trace!(
                    "Filtered out {} packet {} -> {}.",
                    packet.protocol(),
                    packet.ipv4.address_source,
                    packet.ipv4.address_destination
                );
                continue;
            }

            stats.record(packet.protocol());
            let timestamp = frame.timestamp.with_timezone(&Local).time();
            sink.packet(&presenter.render(timestamp, &packet));
        };

        log::debug!("Session state: Running -> Stopping ({}).", stop_reason);
        source.close();
        log::debug!("Session state: Stopping -> Stopped.");

        sink.report(&presentation::format_report(&stats));

        match failure {
            Some(err) => Err(SessionError::Capture(err)),
            None => Ok(SessionSummary { stop_reason, stats }),
        }
    }
}

fn checkpoint(
    shutdown: &AtomicBool, options: &SessionOptions, stats: &CaptureStats, started: Instant,
) -> Option<StopReason> {
    if shutdown.load(Ordering::Acquire) {
        return Some(StopReason::Cancelled);
    }

    if options.count_limit > 0 && stats.total() >= options.count_limit {
        return Some(StopReason::CountLimit);
    }

    match options.time_limit {
        Some(limit) if started.elapsed() >= limit => Some(StopReason::TimeLimit),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to open the capture source.")]
    Open(CaptureError),

    #[error("Frames of link type {0} can't be decoded.")]
    UnsupportedLinkType(i32),

    #[error("Capture stopped on a fatal error.")]
    Capture(CaptureError),
}

impl SessionError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            Self::Open(err) | Self::Capture(err) => {
                let info = match err.additional_info() {
                    Some(info) => format!("{} {}", err, info),
                    None => err.to_string(),
                };
                Some(info)
            },
            Self::UnsupportedLinkType(_) => None,
        }
    }
}
