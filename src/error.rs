use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaylinkError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    #[error("Order {0} not found")]
    OrderNotFound(u64),
    #[error("Unknown log table: {0}")]
    UnknownTable(String),
    #[error("EBANX does not support the payment method: {0}")]
    UnknownPaymentMethod(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
}

/// Failures raised by a [`GatewayClient`](crate::domain::ports::GatewayClient)
/// before a structured response could be obtained.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Transport(String),
    #[error("Unexpected EBANX response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PaylinkError>;
