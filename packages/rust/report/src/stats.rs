//! Aggregate statistics over a batch run.

use std::time::Duration;

use logocrawler_shared::OrganizationResult;
use serde::Serialize;

/// Totals for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    /// Organizations processed.
    pub total: usize,
    /// Organizations that ended with at least one validated logo.
    pub with_logos: usize,
    /// Organizations whose task faulted.
    pub errors: usize,
    /// Validated logos across all organizations.
    pub total_logos: usize,
    /// `with_logos / total` as a percentage; 0 for an empty run.
    pub success_rate: f64,
    #[serde(rename = "total_ms", serialize_with = "as_millis")]
    pub total_duration: Duration,
    #[serde(rename = "average_ms", serialize_with = "as_millis")]
    pub average_duration: Duration,
}

impl RunStats {
    /// Compute stats from results and the wall-clock time of the whole batch.
    pub fn from_results(results: &[OrganizationResult], elapsed: Duration) -> Self {
        let total = results.len();
        let errors = results.iter().filter(|r| r.is_error()).count();
        let with_logos = results.iter().filter(|r| !r.logos.is_empty()).count();
        let total_logos = results.iter().map(|r| r.logos.len()).sum();

        let (success_rate, average_duration) = if total == 0 {
            (0.0, Duration::ZERO)
        } else {
            (
                with_logos as f64 / total as f64 * 100.0,
                elapsed / total as u32,
            )
        };

        Self {
            total,
            with_logos,
            errors,
            total_logos,
            success_rate,
            total_duration: elapsed,
            average_duration,
        }
    }
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_results;

    #[test]
    fn counts_logos_errors_and_rate() {
        let stats = RunStats::from_results(&sample_results(), Duration::from_secs(3));

        assert_eq!(stats.total, 3);
        assert_eq!(stats.with_logos, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total_logos, 2);
        assert!((stats.success_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.average_duration, Duration::from_secs(1));
    }

    #[test]
    fn empty_run_has_zero_rate() {
        let stats = RunStats::from_results(&[], Duration::from_millis(5));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_duration, Duration::ZERO);
    }
}
