// errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseMonitorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid range service address: {0}")]
    InvalidEndpoint(String),

    #[error("Attribute {0} is missing from the new image")]
    MissingAttribute(String),

    #[error("Attribute {attribute} is not an integer: {value}")]
    InvalidNumber { attribute: String, value: String },

    #[error("Range service returned an error: {0}")]
    RangeServiceError(String),

    #[error("{0} not found")]
    PatientNotFound(String),

    #[error("no {0} parameter")]
    MissingParameter(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Категория сбоя, по которой вызывающая сторона решает: пропустить запись или вернуть статус
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    ParseFault,
    ConfigFault,
    TransportFault,
    LookupMiss,
    ValidationFault,
    StorageFault,
}

impl PulseMonitorError {
    pub fn kind(&self) -> FaultKind {
        match self {
            PulseMonitorError::MissingAttribute(_) | PulseMonitorError::InvalidNumber { .. } => {
                FaultKind::ParseFault
            }
            PulseMonitorError::InvalidEndpoint(_) | PulseMonitorError::ConfigError(_) => {
                FaultKind::ConfigFault
            }
            PulseMonitorError::HttpError(_)
            | PulseMonitorError::JsonError(_)
            | PulseMonitorError::RangeServiceError(_) => FaultKind::TransportFault,
            PulseMonitorError::PatientNotFound(_) => FaultKind::LookupMiss,
            PulseMonitorError::MissingParameter(_) => FaultKind::ValidationFault,
            PulseMonitorError::Io(_) | PulseMonitorError::Storage(_) => FaultKind::StorageFault,
        }
    }
}

// Псевдоним Result с фиксированным типом ошибки
pub type Result<T> = std::result::Result<T, PulseMonitorError>;
