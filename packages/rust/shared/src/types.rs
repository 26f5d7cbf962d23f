//! Core domain types shared by every stage of the crawl.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LogoCrawlerError;

// ---------------------------------------------------------------------------
// ValidatedLogo
// ---------------------------------------------------------------------------

/// A candidate URL confirmed to be a decodable image with positive dimensions.
///
/// Only constructible through [`ValidatedLogo::new`], which rejects zero
/// dimensions, so every value in circulation has `width > 0 && height > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValidatedLogo {
    url: String,
    width: u32,
    height: u32,
}

impl ValidatedLogo {
    /// Build a logo record, returning `None` when either dimension is zero.
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            url: url.into(),
            width,
            height,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel area, widened to avoid overflow on very large images.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

// ---------------------------------------------------------------------------
// SizePreference
// ---------------------------------------------------------------------------

/// Minimum dimensions a logo should reach to be considered well-sized.
///
/// Loaded once from the `[preferred]` config section and shared read-only
/// across every concurrent selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePreference {
    pub min_width: u32,
    pub min_height: u32,
}

impl SizePreference {
    /// Whether a logo reaches both minimum dimensions.
    pub fn is_met_by(&self, logo: &ValidatedLogo) -> bool {
        logo.width() >= self.min_width && logo.height() >= self.min_height
    }
}

// ---------------------------------------------------------------------------
// OrganizationResult
// ---------------------------------------------------------------------------

/// Outcome of processing one organization.
#[derive(Debug)]
pub struct OrganizationResult {
    /// The organization identifier exactly as it appeared in the input.
    pub organization: String,
    /// All validated logos, best first.
    pub logos: Vec<ValidatedLogo>,
    /// The highest-scoring logo, if any candidate validated.
    pub best: Option<ValidatedLogo>,
    /// Set only for task faults; `logos` is empty and `best` is `None` then.
    pub error: Option<LogoCrawlerError>,
    /// Wall-clock time spent on this organization.
    pub duration: Duration,
    /// Position in the input list, used to restore input order.
    pub index: usize,
}

impl OrganizationResult {
    /// A completed run (possibly with zero logos).
    pub fn success(
        organization: impl Into<String>,
        index: usize,
        logos: Vec<ValidatedLogo>,
        best: Option<ValidatedLogo>,
        duration: Duration,
    ) -> Self {
        Self {
            organization: organization.into(),
            logos,
            best,
            error: None,
            duration,
            index,
        }
    }

    /// A faulted run. Carries no logos.
    pub fn failure(
        organization: impl Into<String>,
        index: usize,
        error: LogoCrawlerError,
        duration: Duration,
    ) -> Self {
        Self {
            organization: organization.into(),
            logos: Vec::new(),
            best: None,
            error: Some(error),
            duration,
            index,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether `logo` is the selected best logo of this result.
    pub fn is_best(&self, logo: &ValidatedLogo) -> bool {
        self.best.as_ref().is_some_and(|b| b.url() == logo.url())
    }
}
