use anyhow::Result;
use log::{debug, info};
use reqwest::Method;
use std::io::Write;
use std::path::PathBuf;

use crate::{
    client::mask_token,
    runtime::Runtime,
    settings::{ACCESS_TOKEN_FIELD, SettingsForm},
};

pub mod config;

use config::Config;

/// Values given on the command line; `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct ConfigureOptions {
    pub access_token: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_version: Option<String>,
}

/// Store new connection settings and verify them against the API
#[tracing::instrument(skip(runtime, state_path, options))]
pub async fn configure<R: Runtime>(
    runtime: R,
    state_path: Option<PathBuf>,
    options: ConfigureOptions,
) -> Result<()> {
    let config = Config::new(runtime, state_path)?;

    let mut form = SettingsForm::load(&config.client)?;
    if let Some(token) = options.access_token {
        form.access_token = token;
    }
    if let Some(endpoint) = options.api_endpoint {
        form.api_endpoint = endpoint;
    }
    if let Some(version) = options.api_version {
        form.api_version = version;
    }

    form.submit(&config.client).await?;
    println!("Configuration saved.");
    Ok(())
}

/// Print the stored connection settings
#[tracing::instrument(skip(runtime, state_path))]
pub fn show<R: Runtime>(runtime: R, state_path: Option<PathBuf>) -> Result<()> {
    let config = Config::new(runtime, state_path)?;
    let form = SettingsForm::load(&config.client)?;

    for (field, value) in form.fields() {
        if value.is_empty() {
            println!("{}: (not set)", field.title);
            println!("  {}", field.description);
        } else if field == ACCESS_TOKEN_FIELD {
            println!("{}: {}", field.title, mask_token(value));
        } else {
            println!("{}: {}", field.title, value);
        }
    }
    Ok(())
}

/// Call an API path and print the response body
#[tracing::instrument(skip(runtime, state_path, params))]
pub async fn call<R: Runtime>(
    runtime: R,
    state_path: Option<PathBuf>,
    method: Method,
    path: &str,
    params: &[(String, String)],
) -> Result<()> {
    let config = Config::new(runtime, state_path)?;

    let params: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    debug!("Calling {} {} with {:?}", method, path, params);

    let response = config.client.api_call(path, &params, method).await?;
    info!("{} {}", response.status(), response.url());
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.body_bytes())?;
    writeln!(stdout)?;
    Ok(())
}
