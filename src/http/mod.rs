//! HTTP transport with the single re-send on authentication failure.

mod client;
mod error;
mod response;
mod retry;

pub use client::{HttpClient, Request};
pub use error::ClientError;
pub use response::ClientResponse;
pub use retry::{Attempt, MAX_ATTEMPTS};
