use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WxError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("region index {index} out of range for {len} regions")]
    RegionIndex { index: usize, len: usize },

    #[error("invalid date '{value}': {source}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl From<serde_json::Error> for WxError {
    fn from(err: serde_json::Error) -> Self {
        WxError::Malformed(err.to_string())
    }
}
