//! HTTP client with the one-shot authentication retry.

use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use url::form_urlencoded;

use super::error::ClientError;
use super::response::ClientResponse;
use super::retry::{Attempt, MAX_ATTEMPTS};

/// Everything needed to send (and re-send) one API request.
///
/// Requests never carry a body. Parameters travel in the query string for
/// every method, POST included.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
}

impl Request {
    /// The URL as sent: `url`, then `?` and the encoded parameters.
    ///
    /// The parameters always get their own `?`, even when `url` already has a
    /// query string.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{}", self.url, query)
    }
}

/// HTTP client that re-sends a request exactly once after a 401.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Sends the request, re-sending it unchanged once if the API answers 401.
    ///
    /// Any other non-2xx status, a transport fault, or a second failure ends
    /// the call with a [`ClientError`].
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn send_with_auth_retry(&self, request: &Request) -> Result<ClientResponse, ClientError> {
        let response = match self.send_once(request).await {
            Attempt::Success(response) => response,
            Attempt::Failed(error) => {
                debug!("{} {}: non-retryable failure: {}", request.method, request.url, error);
                return Err(error);
            }
            Attempt::Unauthorized(_) => {
                warn!(
                    "{} {}: received 401, attempt {}/{} with the same token...",
                    request.method, request.url, MAX_ATTEMPTS, MAX_ATTEMPTS
                );
                self.send_once(request).await.into_result(request)?
            }
        };

        if !response.is_success() {
            return Err(ClientError::new(
                Some(response),
                "Unknown error occurred during API call",
                None,
            ));
        }

        Ok(response)
    }

    /// Single send without retry.
    pub async fn send_once(&self, request: &Request) -> Attempt {
        debug!("{} {}...", request.method, request.url);

        let builder = self
            .client
            .request(request.method.clone(), request.full_url())
            .headers(request.headers.clone());

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Failed(ClientError::transport(request, e)),
        };

        match ClientResponse::read(response).await {
            Ok(response) => {
                debug!("{} {} -> {}", request.method, response.url(), response.status());
                Attempt::from_response(request, response)
            }
            Err(e) => Attempt::Failed(ClientError::transport(request, e)),
        }
    }
}
