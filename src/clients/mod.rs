pub mod gemini;
pub mod pexels;

use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client for every upstream call.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
