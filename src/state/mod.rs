//! Key-value storage for the persisted API settings.
//!
//! The client never owns its settings; it reads and writes them through a
//! [`StateStore`] handed to it at construction time.

mod file;
mod memory;

use anyhow::Result;

pub use file::{FileState, default_state_path};
pub use memory::MemoryState;

pub const ACCESS_TOKEN_KEY: &str = "broadridge.access_token";
pub const API_ENDPOINT_KEY: &str = "broadridge.api_endpoint";
pub const API_VERSION_KEY: &str = "broadridge.api_version";

#[cfg_attr(test, mockall::automock)]
pub trait StateStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
