//! Client for the Broadridge partner REST API.
//!
//! ```no_run
//! use broadridge::{Client, MemoryState};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = Client::with_state(MemoryState::new())?;
//! client
//!     .set_access_token("abc123")?
//!     .set_api_endpoint("https://mp-advisor.marketpower.com/rest/partner")?
//!     .set_api_version("2.5")?;
//!
//! let response = client.get("/inventory.json", &[("page", "1")]).await?;
//! println!("{}", response.body());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod commands;
pub mod http;
pub mod runtime;
pub mod settings;
pub mod state;

pub use client::{ApiError, Client};
pub use http::{ClientError, ClientResponse};
pub use settings::{SettingsError, SettingsForm};
pub use state::{FileState, MemoryState, StateStore};
