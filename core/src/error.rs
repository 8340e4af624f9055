use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AprsError {
    #[error("Invalid callsign: {0}")]
    InvalidCallsign(String),

    #[error("Invalid SSID: {0}")]
    InvalidSsid(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

pub type Result<T> = std::result::Result<T, AprsError>;
