use reqwest::StatusCode;

use super::client::Request;
use super::response::ClientResponse;

/// A failed API exchange.
///
/// The message always ends with the raw body of the offending response, when
/// there is one, so callers that only print the error still see what the API
/// said.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
    response: Option<ClientResponse>,
    #[source]
    source: Option<reqwest::Error>,
}

impl ClientError {
    pub fn new(
        response: Option<ClientResponse>,
        message: impl Into<String>,
        source: Option<reqwest::Error>,
    ) -> Self {
        let mut message = message.into();
        if let Some(response) = &response {
            message.push_str(response.body());
        }
        Self {
            message,
            response,
            source,
        }
    }

    /// A response that arrived with a non-2xx status.
    pub(crate) fn from_status(request: &Request, response: ClientResponse) -> Self {
        let status = response.status();
        let kind = if status.is_client_error() {
            "Client error"
        } else if status.is_server_error() {
            "Server error"
        } else {
            "Unexpected response"
        };
        let message = format!(
            "{}: `{} {}` resulted in a `{}` response:\n",
            kind,
            request.method,
            response.url(),
            status
        );
        Self::new(Some(response), message, None)
    }

    /// The request never produced a readable response.
    pub(crate) fn transport(request: &Request, error: reqwest::Error) -> Self {
        let message = format!(
            "`{} {}` failed: {}",
            request.method,
            request.full_url(),
            error
        );
        Self::new(None, message, Some(error))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn response(&self) -> Option<&ClientResponse> {
        self.response.as_ref()
    }

    /// Body of the offending response: `None` without a response, and an
    /// empty string when the response carried no body.
    pub fn response_body(&self) -> Option<&str> {
        self.response.as_ref().map(ClientResponse::body)
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(ClientResponse::status)
    }

    pub fn into_response(self) -> Option<ClientResponse> {
        self.response
    }
}
