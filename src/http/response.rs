use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A fully buffered HTTP response.
///
/// The body is read eagerly so the response can be handed to the caller and
/// attached to a [`ClientError`](super::ClientError) without consuming a stream.
/// The raw bytes are kept as received; [`body`](Self::body) is their text
/// with invalid UTF-8 replaced.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    raw: Vec<u8>,
    body: String,
}

impl ClientResponse {
    pub fn new(
        url: impl Into<String>,
        status: StatusCode,
        headers: HeaderMap,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let raw = body.into();
        let body = String::from_utf8_lossy(&raw).into_owned();
        Self {
            url: url.into(),
            status,
            headers,
            raw,
            body,
        }
    }

    /// Drains a reqwest response into memory.
    pub(crate) async fn read(response: reqwest::Response) -> reqwest::Result<Self> {
        let url = response.url().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let raw = response.bytes().await?;
        Ok(Self::new(url, status, headers, raw.to_vec()))
    }

    /// The final URL the request was sent to, query string included.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn is_success(&self) -> bool {
        self.status.as_u16() / 100 == 2
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.raw)
    }

    /// Decodes an error payload.
    ///
    /// The API reports errors either as a single object or as a list of
    /// objects; for a list the first non-empty entry is returned.
    pub fn error_data(&self) -> serde_json::Result<Value> {
        let data: Value = self.json()?;
        match data {
            Value::Array(mut items) if !items.is_empty() && !is_empty_value(&items[0]) => {
                Ok(items.swap_remove(0))
            }
            other => Ok(other),
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(_) => false,
    }
}
