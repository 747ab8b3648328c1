//! API connection settings: load, validate, store, and verify with a live
//! request.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};

use crate::client::{ApiError, Client};
use crate::http::ClientResponse;
use crate::state::StateStore;

/// Request used to confirm that freshly entered settings work.
pub const PROBE_PATH: &str = "/inventory.json?page=1";

/// Static description of one settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub title: &'static str,
    pub description: &'static str,
}

pub const ACCESS_TOKEN_FIELD: Field = Field {
    title: "API Token",
    description: "Token used to authenticate api calls.",
};

pub const API_ENDPOINT_FIELD: Field = Field {
    title: "Broadridge API endpoint",
    description: "Enter the broadridge partner endpoint URL. Default is https://mp-advisor.marketpower.com/rest/partner. Do not include trailing slash.",
};

pub const API_VERSION_FIELD: Field = Field {
    title: "API Version",
    description: "Enter the API version to use. Default is 2.5",
};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// One line per blank field, in form order.
    #[error("{}", required_message(.fields))]
    Required { fields: Vec<Field> },

    /// The probe request failed. Carries no detail from the failed request.
    #[error("Unable to get valid response from broadridge API")]
    Unreachable,

    #[error(transparent)]
    Api(ApiError),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

fn required_message(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| format!("{} field is required.", field.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Where settings are read from, written to, and verified against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    fn access_token(&self) -> Result<Option<String>>;
    fn api_endpoint(&self) -> Result<Option<String>>;
    fn api_version(&self) -> Result<Option<String>>;
    fn store(&self, access_token: &str, api_endpoint: &str, api_version: &str) -> Result<()>;
    async fn probe(&self, path: &str) -> Result<ClientResponse, ApiError>;
}

#[async_trait]
impl<S: StateStore> SettingsBackend for Client<S> {
    fn access_token(&self) -> Result<Option<String>> {
        Client::access_token(self)
    }

    fn api_endpoint(&self) -> Result<Option<String>> {
        Client::api_endpoint(self)
    }

    fn api_version(&self) -> Result<Option<String>> {
        Client::api_version(self)
    }

    fn store(&self, access_token: &str, api_endpoint: &str, api_version: &str) -> Result<()> {
        self.set_access_token(access_token)?
            .set_api_endpoint(api_endpoint)?
            .set_api_version(api_version)?;
        Ok(())
    }

    async fn probe(&self, path: &str) -> Result<ClientResponse, ApiError> {
        self.get(path, &[]).await
    }
}

/// The three connection settings as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub access_token: String,
    pub api_endpoint: String,
    pub api_version: String,
}

impl SettingsForm {
    /// Prefills the form with the currently stored values.
    #[tracing::instrument(skip(backend))]
    pub fn load<B: SettingsBackend>(backend: &B) -> Result<Self> {
        Ok(Self {
            access_token: backend.access_token()?.unwrap_or_default(),
            api_endpoint: backend.api_endpoint()?.unwrap_or_default(),
            api_version: backend.api_version()?.unwrap_or_default(),
        })
    }

    pub fn fields(&self) -> [(Field, &str); 3] {
        [
            (ACCESS_TOKEN_FIELD, self.access_token.as_str()),
            (API_ENDPOINT_FIELD, self.api_endpoint.as_str()),
            (API_VERSION_FIELD, self.api_version.as_str()),
        ]
    }

    /// Checks that every field has a non-blank value, reporting all blank
    /// fields at once.
    pub fn validate_required(&self) -> Result<(), SettingsError> {
        let fields: Vec<Field> = self
            .fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::Required { fields })
        }
    }

    /// Stores the values and verifies them against the live API.
    ///
    /// The values are stored before the probe runs, so they stay stored even
    /// when the probe fails. Nothing is stored if a field is blank.
    #[tracing::instrument(skip(self, backend))]
    pub async fn submit<B: SettingsBackend>(&self, backend: &B) -> Result<(), SettingsError> {
        self.validate_required()?;

        backend.store(&self.access_token, &self.api_endpoint, &self.api_version)?;
        debug!("Stored settings, probing {}{}", self.api_endpoint, PROBE_PATH);

        match backend.probe(PROBE_PATH).await {
            Ok(response) => {
                info!("Broadridge API answered {}", response.status());
                Ok(())
            }
            Err(ApiError::Client(e)) => {
                debug!("Connectivity probe failed: {}", e);
                Err(SettingsError::Unreachable)
            }
            Err(e) => Err(SettingsError::Api(e)),
        }
    }
}
