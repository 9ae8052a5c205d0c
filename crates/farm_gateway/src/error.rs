use thiserror::Error;

/// Why a reading could not be produced. Callers treat every variant the
/// same way: substitute the fallback and keep going.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to climate API failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("climate API returned HTTP {status}")]
    Api { status: u16 },

    #[error("climate API response has no data for {parameter}")]
    DataMissing { parameter: String },

    #[error("climate API response is malformed: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Short, stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => "network",
            GatewayError::Api { .. } => "api_error",
            GatewayError::DataMissing { .. } => "data_missing",
            GatewayError::Malformed(_) => "malformed",
        }
    }
}
