use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Network Error: {0}")]
    Network(String),
    #[error("Remote API Error: {0}")]
    Api(String),
    #[error("Unknown User: {0}")]
    UnknownUser(String),
    #[error("Input Error: {0}")]
    Input(String),
    #[error("Serialization Error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T, E = AnalyticsError> = std::result::Result<T, E>;
