//! Domain resolution and logo candidate discovery.
//!
//! Given an organization name or URL, [`resolve_domain`] guesses its domain and
//! [`CandidateExtractor`] produces the URLs worth checking for a logo: image
//! hints from the home page markup, a fixed list of well-known icon paths, and
//! one logo-lookup service URL. Every network or parse failure here is
//! absorbed; an unreachable site still yields its fallback candidates.

mod markup;
mod resolver;

use std::collections::HashSet;

use logocrawler_shared::{LogoCrawlerError, Result};
use reqwest::Client;
use tracing::{debug, instrument};
use url::{Host, Url};

pub use markup::ImageRules;
pub use resolver::resolve_domain;

/// Well-known icon and logo paths probed on every domain.
pub const FALLBACK_PATHS: &[&str] = &[
    "/favicon.ico",
    "/favicon.png",
    "/favicon.svg",
    "/apple-touch-icon.png",
    "/apple-touch-icon-precomposed.png",
    "/logo.png",
    "/assets/logo.png",
    "/images/logo.png",
];

/// Default logo-lookup service; the domain is appended verbatim.
pub const DEFAULT_LOOKUP_BASE: &str = "https://logo.clearbit.com/";

/// Pages larger than this are not parsed (5 MB).
const MAX_PAGE_SIZE: usize = 5 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for candidate extraction.
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// Scheme used to build page and fallback URLs.
    pub scheme: String,
    /// Prefix of the logo-lookup service URL.
    pub lookup_base: String,
    /// Heuristics for `<img>` candidates.
    pub rules: ImageRules,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            scheme: "https".into(),
            lookup_base: DEFAULT_LOOKUP_BASE.into(),
            rules: ImageRules::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// CandidateExtractor
// ---------------------------------------------------------------------------

/// Produces deduplicated logo candidate URLs for a domain.
#[derive(Debug, Clone)]
pub struct CandidateExtractor {
    client: Client,
    options: ExtractorOptions,
}

impl CandidateExtractor {
    /// Create an extractor sharing the given HTTP client.
    pub fn new(client: &Client, options: ExtractorOptions) -> Self {
        Self {
            client: client.clone(),
            options,
        }
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Collect candidate logo URLs for `domain`, first-seen order, no duplicates.
    #[instrument(skip(self))]
    pub async fn extract(&self, domain: &str) -> Vec<String> {
        let apex = self.site_url(domain);

        let mut candidates = match self.www_url(domain) {
            Some(www) => {
                let (mut from_apex, from_www) =
                    tokio::join!(self.scan_page(&apex), self.scan_page(&www));
                from_apex.extend(from_www);
                from_apex
            }
            None => self.scan_page(&apex).await,
        };

        let from_markup = candidates.len();
        candidates.extend(self.fallback_urls(domain));
        candidates.push(self.lookup_url(domain));

        let candidates = dedupe(candidates);
        debug!(from_markup, total = candidates.len(), "candidates extracted");
        candidates
    }

    /// Fixed well-known icon/logo URLs rooted at the apex domain.
    pub fn fallback_urls(&self, domain: &str) -> Vec<String> {
        let base = self.site_url(domain);
        FALLBACK_PATHS
            .iter()
            .map(|path| format!("{base}{path}"))
            .collect()
    }

    /// Logo-lookup service URL for `domain`.
    pub fn lookup_url(&self, domain: &str) -> String {
        format!("{}{domain}", self.options.lookup_base)
    }

    fn site_url(&self, domain: &str) -> String {
        format!("{}://{domain}", self.options.scheme)
    }

    /// The `www.` variant, unless already prefixed or the host is an IP literal.
    fn www_url(&self, domain: &str) -> Option<String> {
        if domain.starts_with("www.") {
            return None;
        }
        let parsed = Url::parse(&self.site_url(domain)).ok()?;
        match parsed.host()? {
            Host::Domain(_) => Some(self.site_url(&format!("www.{domain}"))),
            Host::Ipv4(_) | Host::Ipv6(_) => None,
        }
    }

    /// Fetch one page and scan it; failures contribute nothing.
    async fn scan_page(&self, url: &str) -> Vec<String> {
        match self.fetch_markup(url).await {
            Ok((final_url, body)) => {
                let found = markup::scan_markup(&body, &final_url, &self.options.rules);
                debug!(%url, %final_url, found = found.len(), "scanned page markup");
                found
            }
            Err(e) => {
                debug!(%url, error = %e, "page unavailable, skipping markup candidates");
                Vec::new()
            }
        }
    }

    /// GET a page, returning its post-redirect URL and at most
    /// [`MAX_PAGE_SIZE`] bytes of its body.
    ///
    /// Error statuses are not failures: error pages usually keep the site
    /// header, so their markup is scanned like any other.
    async fn fetch_markup(&self, url: &str) -> Result<(Url, String)> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LogoCrawlerError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "error status, scanning body anyway");
        }

        let final_url = response.url().clone();
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| LogoCrawlerError::Network(format!("{url}: failed to read body: {e}")))?
        {
            let room = MAX_PAGE_SIZE - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(%url, max = MAX_PAGE_SIZE, "page truncated at size cap");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok((final_url, String::from_utf8_lossy(&body).into_owned()))
    }
}

/// Drop empty strings and exact duplicates, keeping first-seen order.
pub fn dedupe(list: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}
