use shared::error::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("listing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("listing endpoint answered with status {0}")]
    Status(u16),
    #[error("malformed listing response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("listing response violates page contract: {0}")]
    Contract(#[from] ContractError),
    #[error("invalid listing url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether the response arrived but could not be trusted for rendering.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Malformed(_) | FetchError::Contract(_))
    }
}

impl From<url::ParseError> for FetchError {
    fn from(value: url::ParseError) -> Self {
        FetchError::InvalidUrl(value.to_string())
    }
}
