//! Concurrent candidate validation.
//!
//! Every candidate URL is fetched in its own task, bounded by a
//! [`PermitPool`] and by a single deadline shared by the whole batch. Only the
//! image header is read: the body is streamed until `imagesize` can report
//! dimensions, then the connection is dropped. Anything that fails, times out,
//! or does not decode to positive dimensions is silently left out.

use std::time::Duration;

use logocrawler_shared::{LogoCrawlerError, Result, ValidatedLogo};
use reqwest::Client;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, instrument};

use crate::permits::PermitPool;

/// Default concurrent validations per batch.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Default deadline for a whole validation batch.
pub const DEFAULT_BATCH_DEADLINE: Duration = Duration::from_secs(30);

/// Stop reading a body after this many bytes without finding a header (512 KiB).
const DEFAULT_MAX_PROBE_BYTES: usize = 512 * 1024;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for candidate validation.
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Permit pool capacity.
    pub max_concurrent: usize,
    /// Shared deadline for permit waits and fetches of one batch.
    pub deadline: Duration,
    /// Body bytes read at most while looking for an image header.
    pub max_probe_bytes: usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            deadline: DEFAULT_BATCH_DEADLINE,
            max_probe_bytes: DEFAULT_MAX_PROBE_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// CandidateValidator
// ---------------------------------------------------------------------------

/// Turns candidate URLs into [`ValidatedLogo`]s.
#[derive(Debug, Clone)]
pub struct CandidateValidator {
    client: Client,
    options: ValidatorOptions,
}

impl CandidateValidator {
    /// Create a validator sharing the given HTTP client.
    pub fn new(client: &Client, options: ValidatorOptions) -> Self {
        Self {
            client: client.clone(),
            options,
        }
    }

    /// Validate all candidates concurrently.
    ///
    /// The result is in candidate order and contains only images with positive
    /// width and height. Never fails; an all-miss batch yields an empty list.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn validate(&self, candidates: &[String]) -> Vec<ValidatedLogo> {
        let pool = PermitPool::new(self.options.max_concurrent);
        self.validate_with_pool(candidates, &pool).await
    }

    async fn validate_with_pool(
        &self,
        candidates: &[String],
        pool: &PermitPool,
    ) -> Vec<ValidatedLogo> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let deadline = Instant::now() + self.options.deadline;
        let mut handles = Vec::with_capacity(candidates.len());

        for url in candidates {
            let client = self.client.clone();
            let pool = pool.clone();
            let url = url.clone();
            let max_bytes = self.options.max_probe_bytes;

            handles.push(tokio::spawn(async move {
                let attempt = timeout_at(deadline, async {
                    let Some(_permit) = pool.acquire().await else {
                        return Err(LogoCrawlerError::task("permit pool closed"));
                    };
                    probe_dimensions(&client, &url, max_bytes).await
                })
                .await;

                match attempt {
                    Ok(Ok((width, height))) => ValidatedLogo::new(url, width, height),
                    Ok(Err(e)) => {
                        debug!(%url, error = %e, "candidate rejected");
                        None
                    }
                    Err(_) => {
                        debug!(%url, "candidate abandoned at batch deadline");
                        None
                    }
                }
            }));
        }

        let mut valid = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Some(logo)) => valid.push(logo),
                Ok(None) => {}
                Err(e) => debug!(error = %e, "validation task failed"),
            }
        }

        debug!(
            valid = valid.len(),
            peak_in_flight = pool.peak(),
            "validation batch finished"
        );
        valid
    }
}

// ---------------------------------------------------------------------------
// Probing
// ---------------------------------------------------------------------------

/// Fetch `url` and read just enough of it to learn the image dimensions.
async fn probe_dimensions(client: &Client, url: &str, max_bytes: usize) -> Result<(u32, u32)> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LogoCrawlerError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LogoCrawlerError::Network(format!("{url}: HTTP {status}")));
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html"));
    if is_html {
        return Err(LogoCrawlerError::validation(format!(
            "{url}: HTML response, not an image"
        )));
    }

    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| LogoCrawlerError::Network(format!("{url}: body read failed: {e}")))?
    {
        buf.extend_from_slice(&chunk);
        if let Ok(size) = imagesize::blob_size(&buf) {
            return to_dimensions(url, size);
        }
        if buf.len() >= max_bytes {
            break;
        }
    }

    let size = imagesize::blob_size(&buf)
        .map_err(|e| LogoCrawlerError::parse(format!("{url}: undecodable image header: {e}")))?;
    to_dimensions(url, size)
}

fn to_dimensions(url: &str, size: imagesize::ImageSize) -> Result<(u32, u32)> {
    let width = u32::try_from(size.width).unwrap_or(0);
    let height = u32::try_from(size.height).unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(LogoCrawlerError::parse(format!(
            "{url}: image reports {width}x{height}"
        )));
    }
    Ok((width, height))
}
