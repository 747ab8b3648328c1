//! Outcome classification for the single re-send on HTTP 401.
//!
//! An expired-looking token gets exactly one more try with the same
//! credentials. No refresh happens in between, there is no delay, and no
//! other status is ever retried.

use reqwest::StatusCode;

use super::client::Request;
use super::error::ClientError;
use super::response::ClientResponse;

/// The original send plus one re-send after a 401.
pub const MAX_ATTEMPTS: usize = 2;

/// Outcome of sending a request once.
#[derive(Debug)]
pub enum Attempt {
    /// The API answered with a 2xx status.
    Success(ClientResponse),
    /// The API answered with exactly 401; the request may be sent once more.
    Unauthorized(ClientResponse),
    /// Any other status, or no response at all.
    Failed(ClientError),
}

impl Attempt {
    /// Classifies a response that arrived.
    pub fn from_response(request: &Request, response: ClientResponse) -> Self {
        if response.is_success() {
            Attempt::Success(response)
        } else if response.status() == StatusCode::UNAUTHORIZED {
            Attempt::Unauthorized(response)
        } else {
            Attempt::Failed(ClientError::from_status(request, response))
        }
    }

    /// Settles the attempt without another try: a 401 becomes a failure.
    pub fn into_result(self, request: &Request) -> Result<ClientResponse, ClientError> {
        match self {
            Attempt::Success(response) => Ok(response),
            Attempt::Unauthorized(response) => Err(ClientError::from_status(request, response)),
            Attempt::Failed(error) => Err(error),
        }
    }
}
