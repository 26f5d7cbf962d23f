//! Per-organization pipeline: input → domain → candidates → validated logos → best.

use std::future::Future;

use logocrawler_crawler::{CandidateValidator, ValidatorOptions};
use logocrawler_discovery::{CandidateExtractor, ExtractorOptions, resolve_domain};
use logocrawler_shared::{Result, SizePreference, ValidatedLogo};
use reqwest::Client;
use tracing::{info, instrument};
use url::Url;

use crate::selector::{LogoSelector, ScoringRules, order_best_first};

/// Options for every stage of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub extractor: ExtractorOptions,
    pub validator: ValidatorOptions,
    pub scoring: ScoringRules,
}

/// Logos found for one organization.
#[derive(Debug, Clone)]
pub struct OrganizationLogos {
    /// The domain the input resolved to.
    pub domain: String,
    /// Validated logos, best first.
    pub logos: Vec<ValidatedLogo>,
    /// The selected best logo.
    pub best: Option<ValidatedLogo>,
}

/// Processes one organization end to end.
///
/// Implemented by [`LogoPipeline`]; the orchestrator only depends on this
/// trait so it can drive any per-organization work.
pub trait OrganizationProcessor: Send + Sync + 'static {
    /// Find logos for one organization identifier.
    ///
    /// An `Err` is a task fault. Ordinary misses (nothing reachable, nothing
    /// decodable) are an `Ok` with no logos.
    fn process(
        &self,
        input: &str,
        prefs: &SizePreference,
    ) -> impl Future<Output = Result<OrganizationLogos>> + Send;
}

// ---------------------------------------------------------------------------
// LogoPipeline
// ---------------------------------------------------------------------------

/// Resolver, extractor, validator, and selector wired to one HTTP client.
#[derive(Debug, Clone)]
pub struct LogoPipeline {
    extractor: CandidateExtractor,
    validator: CandidateValidator,
    selector: LogoSelector,
}

impl LogoPipeline {
    /// Build the pipeline around a shared client.
    pub fn new(client: &Client, options: PipelineOptions) -> Self {
        let PipelineOptions {
            extractor,
            validator,
            mut scoring,
        } = options;

        // The selector must recognize whatever lookup service the extractor uses.
        if let Some(host) = Url::parse(&extractor.lookup_base)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
        {
            if !scoring.lookup_markers.contains(&host) {
                scoring.lookup_markers.push(host);
            }
        }

        Self {
            extractor: CandidateExtractor::new(client, extractor),
            validator: CandidateValidator::new(client, validator),
            selector: LogoSelector::new(scoring),
        }
    }

    pub fn selector(&self) -> &LogoSelector {
        &self.selector
    }

    /// Run every stage for one organization.
    #[instrument(skip(self, prefs))]
    pub async fn fetch_logos(&self, input: &str, prefs: &SizePreference) -> OrganizationLogos {
        let domain = resolve_domain(input);

        let candidates = self.extractor.extract(&domain).await;
        let valid = self.validator.validate(&candidates).await;
        let best = self.selector.select_best(&valid, prefs);
        let logos = order_best_first(valid, best.as_ref());

        info!(
            %domain,
            candidates = candidates.len(),
            valid = logos.len(),
            best = best.as_ref().map(|b| b.url()).unwrap_or("-"),
            "organization processed"
        );

        OrganizationLogos {
            domain,
            logos,
            best,
        }
    }
}

impl OrganizationProcessor for LogoPipeline {
    fn process(
        &self,
        input: &str,
        prefs: &SizePreference,
    ) -> impl Future<Output = Result<OrganizationLogos>> + Send {
        async move { Ok(self.fetch_logos(input, prefs).await) }
    }
}
