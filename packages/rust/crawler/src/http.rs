//! The shared HTTP transport.
//!
//! One [`reqwest::Client`] is built per process and handed (by reference) to
//! the extractor and the validator; clones share the same connection pool.

use std::time::Duration;

use logocrawler_shared::{LogoCrawlerError, Result};
use reqwest::Client;

/// User-Agent string for all crawl requests.
pub const USER_AGENT: &str = concat!("LogoCrawler/", env!("CARGO_PKG_VERSION"));

/// Transport settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Idle keep-alive connections retained per host.
    pub pool_max_idle_per_host: usize,
    /// How long an idle connection is kept.
    pub pool_idle_timeout: Duration,
    /// Redirect hops followed before giving up.
    pub max_redirects: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            max_redirects: 10,
        }
    }
}

/// Build the process-wide client.
pub fn build_http_client(opts: &HttpOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(opts.timeout)
        .pool_max_idle_per_host(opts.pool_max_idle_per_host)
        .pool_idle_timeout(opts.pool_idle_timeout)
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(opts.max_redirects))
        .build()
        .map_err(|e| LogoCrawlerError::Network(format!("failed to build HTTP client: {e}")))
}
