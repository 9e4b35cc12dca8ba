use thiserror::Error;

use crate::chart::ValidationReport;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Position occupied: measure {measure}, beat {beat}")]
    Conflict { measure: u32, beat: u32 },

    #[error("Invalid chart: {0}")]
    InvalidChart(ValidationReport),

    #[error("No chart loaded")]
    NoChartLoaded,

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Input script error at line {line}: {message}")]
    InputParse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParse(e.message().to_string())
    }
}

impl Error {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation(message.into())
    }
}
