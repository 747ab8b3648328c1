//! Broadridge partner API client.
//!
//! [`Client`] keeps no settings of its own. The access token, endpoint and
//! API version are read from the injected [`StateStore`] on every call, so a
//! value written through one handle is seen by the next request.

mod error;

use anyhow::Result;
use log::debug;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use crate::http::{ClientResponse, HttpClient, Request};
use crate::state::{ACCESS_TOKEN_KEY, API_ENDPOINT_KEY, API_VERSION_KEY, StateStore};

pub use error::ApiError;

pub const USER_AGENT: &str = "broadridge-cli";

pub struct Client<S: StateStore> {
    http: HttpClient,
    state: S,
}

impl<S: StateStore> Client<S> {
    pub fn new(http: HttpClient, state: S) -> Self {
        Self { http, state }
    }

    /// Creates a client over a default reqwest Client.
    pub fn with_state(state: S) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::new(HttpClient::new(client), state))
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// The stored access token, or `None` when unset or empty.
    pub fn access_token(&self) -> Result<Option<String>> {
        Ok(self
            .state
            .get(ACCESS_TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    pub fn set_access_token(&self, token: &str) -> Result<&Self> {
        self.state.set(ACCESS_TOKEN_KEY, token)?;
        Ok(self)
    }

    pub fn api_endpoint(&self) -> Result<Option<String>> {
        self.state.get(API_ENDPOINT_KEY)
    }

    /// Stores the base URL; request paths are appended to it verbatim.
    pub fn set_api_endpoint(&self, endpoint: &str) -> Result<&Self> {
        self.state.set(API_ENDPOINT_KEY, endpoint)?;
        Ok(self)
    }

    pub fn api_version(&self) -> Result<Option<String>> {
        self.state.get(API_VERSION_KEY)
    }

    pub fn set_api_version(&self, version: &str) -> Result<&Self> {
        self.state.set(API_VERSION_KEY, version)?;
        Ok(self)
    }

    /// Calls `<endpoint><path>` and returns the 2xx response.
    ///
    /// `params` are encoded into the query string whatever the method, always
    /// after a fresh `?`; the request body is always empty. A 401 is answered by sending the very
    /// same request once more, token unchanged.
    #[tracing::instrument(skip(self, params))]
    pub async fn api_call(
        &self,
        path: &str,
        params: &[(&str, &str)],
        method: Method,
    ) -> Result<ClientResponse, ApiError> {
        let token = self.access_token()?.ok_or(ApiError::MissingToken)?;
        let endpoint = self.api_endpoint()?.unwrap_or_default();
        let version = self.api_version()?.unwrap_or_default();

        debug!("Using access token {}", mask_token(&token));

        let request = Request {
            method,
            url: format!("{}{}", endpoint, path),
            headers: api_headers(&token, &version)?,
            query: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };

        Ok(self.http.send_with_auth_retry(&request).await?)
    }

    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<ClientResponse, ApiError> {
        self.api_call(path, params, Method::GET).await
    }

    pub async fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<ClientResponse, ApiError> {
        self.api_call(path, params, Method::POST).await
    }
}

fn api_headers(token: &str, version: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let mut auth_value = HeaderValue::from_str(token)?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(
        ACCEPT,
        HeaderValue::from_str(&format!("application/json;version={}", version))?,
    );
    Ok(headers)
}

/// Hides all but the edges of a token for display and logs.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
