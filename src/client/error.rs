use reqwest::header::InvalidHeaderValue;

use crate::http::ClientError;

/// Errors returned by [`Client::api_call`](super::Client::api_call).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No access token is configured; nothing was sent.
    #[error("Missing API Token")]
    MissingToken,

    /// A stored setting cannot be sent as a header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// The settings store could not be read.
    #[error(transparent)]
    Settings(#[from] anyhow::Error),
}

impl ApiError {
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            ApiError::Client(e) => Some(e),
            _ => None,
        }
    }
}
