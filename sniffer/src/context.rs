use crate::config::Config;
use crate::filter::FilterCriteria;
use crate::net::interface::CaptureSettings;
use crate::presentation::Presenter;
use crate::session::SessionOptions;
use dpi::analysis::ports;
use dpi::analysis::ports::PortServiceTable;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Everything a session needs, derived once from the config.
pub struct Context {
    pub capture_settings: CaptureSettings,
    pub filter: FilterCriteria,
    pub session_options: SessionOptions,
    pub services: PortServiceTable,
    pub show_payload_hexdump: bool,
    pub verbose: bool,
}

impl Context {
    pub fn new(config: &Config) -> Result<Self, ContextError> {
        let mut services = ports::well_known();
        if let Some(path) = &config.port_database {
            let database = ports::read_database(path)
                .map_err(|err| ContextError::PortDatabase(path.clone(), err))?;
            log::debug!(
                "Loaded {} ports from the service database {}.",
                database.len(),
                path.display()
            );
            ports::merge(&mut services, database);
        }

        let time_limit = match config.time_limit_seconds {
            0 => None,
            seconds => Some(Duration::from_secs(seconds)),
        };

        Ok(Self {
            capture_settings: CaptureSettings {
                interface: config.interface.clone(),
                promiscuous: config.promiscuous,
                read_timeout_ms: config.read_timeout_ms,
            },
            filter: FilterCriteria::from(config),
            session_options: SessionOptions {
                count_limit: config.count_limit,
                time_limit,
            },
            services,
            show_payload_hexdump: config.show_payload_hexdump,
            verbose: config.verbose,
        })
    }

    pub fn presenter(&self) -> Presenter {
        Presenter::new(
            self.services.clone(),
            self.show_payload_hexdump,
            self.verbose,
        )
    }
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to load the port database {}.", .0.display())]
    PortDatabase(PathBuf, std::io::Error),
}

impl ContextError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            Self::PortDatabase(_, err) => Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpi::protocols::ip::protocol::IpNextLevelProtocol;
    use std::net::Ipv4Addr;

    #[test]
    fn test_defaults() {
        let context = Context::new(&Config::default()).unwrap();

        assert!(context.filter.is_empty());
        assert_eq!(context.session_options, SessionOptions::default());
        assert_eq!(context.capture_settings.read_timeout_ms, 250);
        assert_eq!(ports::service_name(&context.services, 443, "tcp"), Some("HTTPS"));
    }

    #[test]
    fn test_limits_and_filters() {
        let config = Config {
            protocol_filter: Some(IpNextLevelProtocol::UDP),
            port_filter: Some(53),
            host_filter: Some(Ipv4Addr::new(8, 8, 8, 8)),
            count_limit: 10,
            time_limit_seconds: 30,
            ..Config::default()
        };

        let context = Context::new(&config).unwrap();

        assert_eq!(context.filter.protocol, Some(IpNextLevelProtocol::UDP));
        assert_eq!(context.filter.port, Some(53));
        assert_eq!(context.filter.host, Some(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(context.session_options.count_limit, 10);
        assert_eq!(
            context.session_options.time_limit,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_missing_port_database() {
        let config = Config {
            port_database: Some(PathBuf::from("definitely/not/here.csv")),
            ..Config::default()
        };

        let result = Context::new(&config);

        assert!(matches!(result, Err(ContextError::PortDatabase(_, _))));
    }
}
