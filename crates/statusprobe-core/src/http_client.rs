//! HTTP client construction for probes and status board calls

use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for HTTP probes (5 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("statusprobe/", env!("CARGO_PKG_VERSION"));

/// Builds HTTP client with the given overall request timeout
///
/// The timeout covers connect, request and response headers, so a hung
/// server cannot hold a probe past it.
///
/// # Errors
///
/// Returns error if client construction fails (TLS backend initialisation)
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
}
