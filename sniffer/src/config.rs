use common::logging;
use dpi::protocols::ip::protocol::IpNextLevelProtocol;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_READ_TIMEOUT_MS: u32 = 250;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub log_format: String,
    pub log_level: LevelFilter,
    pub log_to_file: bool,

    pub interface: Option<String>,
    pub promiscuous: bool,
    pub read_timeout_ms: u32,

    pub protocol_filter: Option<IpNextLevelProtocol>,
    pub port_filter: Option<u16>,
    pub host_filter: Option<Ipv4Addr>,

    /// 0 - unlimited.
    pub count_limit: u64,
    /// 0 - unlimited.
    pub time_limit_seconds: u64,

    pub show_payload_hexdump: bool,
    pub verbose: bool,
    pub port_database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_format: logging::DEFAULT_FORMAT.to_string(),
            log_level: LevelFilter::Info,
            log_to_file: false,

            interface: None,
            promiscuous: false,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,

            protocol_filter: None,
            port_filter: None,
            host_filter: None,

            count_limit: 0,
            time_limit_seconds: 0,

            show_payload_hexdump: false,
            verbose: false,
            port_database: None,
        }
    }
}

impl Config {
    /// Reads `config.toml` from the working directory. Writes the defaults if it's missing.
    pub fn from_file() -> Result<Self, ConfigError> {
        Self::from_path(CONFIG_FILENAME)
    }

    /// Only a missing file falls back to the defaults. Any other read error
    /// leaves the file untouched and is returned.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = match std::fs::read_to_string(&path) {
            Ok(value) => value,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let config = Config::default();
                config.save_to_path(&path)?;
                return Ok(config);
            },
            Err(err) => return Err(ConfigError::IOError(err)),
        };

        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> Result<Self, ConfigError> {
        let dto: ConfigDto =
            toml::from_str(data).map_err(ConfigError::TomlDeserializationError)?;
        dto.into_config()
    }

    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILENAME)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let data = toml::to_string(&ConfigDto::from(self))
            .map_err(ConfigError::TomlSerializationError)?;

        std::fs::write(path, data).map_err(ConfigError::IOError)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ConfigDto {
    log_format: String,
    log_level: String,
    log_to_file: bool,

    interface: Option<String>,
    promiscuous: bool,
    read_timeout_ms: u32,

    protocol_filter: Option<String>,
    port_filter: Option<u16>,
    host_filter: Option<String>,

    count_limit: u64,
    time_limit_seconds: u64,

    show_payload_hexdump: bool,
    verbose: bool,
    port_database: Option<PathBuf>,
}

impl Default for ConfigDto {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ConfigDto {
    fn from(config: &Config) -> Self {
        Self {
            log_format: config.log_format.clone(),
            log_level: config.log_level.to_string().to_lowercase(),
            log_to_file: config.log_to_file,

            interface: config.interface.clone(),
            promiscuous: config.promiscuous,
            read_timeout_ms: config.read_timeout_ms,

            protocol_filter: config
                .protocol_filter
                .map(|protocol| protocol.to_string().to_lowercase()),
            port_filter: config.port_filter,
            host_filter: config.host_filter.map(|host| host.to_string()),

            count_limit: config.count_limit,
            time_limit_seconds: config.time_limit_seconds,

            show_payload_hexdump: config.show_payload_hexdump,
            verbose: config.verbose,
            port_database: config.port_database.clone(),
        }
    }
}

impl ConfigDto {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::WrongReadTimeout);
        }

        let protocol_filter = match self.protocol_filter {
            None => None,
            Some(value) => Some(
                IpNextLevelProtocol::from_str(value.trim())
                    .map_err(|_| ConfigError::UnknownProtocolFilter(value))?,
            ),
        };

        let host_filter = match self.host_filter {
            None => None,
            Some(value) => Some(
                Ipv4Addr::from_str(value.trim())
                    .map_err(|_| ConfigError::WrongHostFilter(value))?,
            ),
        };

        let config = Config {
            log_format: self.log_format,
            log_level: LevelFilter::from_str(&self.log_level)
                .map_err(|_| ConfigError::UnknownLogLevel)?,
            log_to_file: self.log_to_file,

            interface: self.interface,
            promiscuous: self.promiscuous,
            read_timeout_ms: self.read_timeout_ms,

            protocol_filter,
            port_filter: self.port_filter,
            host_filter,

            count_limit: self.count_limit,
            time_limit_seconds: self.time_limit_seconds,

            show_payload_hexdump: self.show_payload_hexdump,
            verbose: self.verbose,
            port_database: self.port_database,
        };

        Ok(config)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error.")]
    IOError(#[from] std::io::Error),

    #[error("TOML Serialization Error.")]
    TomlSerializationError(#[from] toml::ser::Error),

    #[error("TOML Deserialization Error.")]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error("Unknown log level.")]
    UnknownLogLevel,

    #[error("Unknown protocol filter \"{0}\". Expected tcp, udp or icmp.")]
    UnknownProtocolFilter(String),

    #[error("Host filter \"{0}\" is not a dotted-decimal IPv4 address.")]
    WrongHostFilter(String),

    #[error("Read timeout must be greater than zero.")]
    WrongReadTimeout,
}

impl ConfigError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            ConfigError::IOError(err) => Some(err.to_string()),
            ConfigError::TomlSerializationError(err) => Some(err.to_string()),
            ConfigError::TomlDeserializationError(err) => Some(err.to_string()),
            _ => None,
        }
    }
}
