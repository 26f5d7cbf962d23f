//! Machine-readable export of a run.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use logocrawler_shared::{LogoCrawlerError, OrganizationResult, Result, ValidatedLogo};
use serde::Serialize;
use tracing::{info, instrument};

use crate::stats::RunStats;
use crate::write_atomic;

/// Serialized form of a whole run.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub stats: RunStats,
    pub organizations: Vec<OrganizationEntry<'a>>,
}

/// One organization in the export.
#[derive(Debug, Serialize)]
pub struct OrganizationEntry<'a> {
    pub organization: &'a str,
    pub index: usize,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub best: Option<&'a ValidatedLogo>,
    pub logos: &'a [ValidatedLogo],
}

impl<'a> ReportDocument<'a> {
    pub fn new(results: &'a [OrganizationResult], elapsed: Duration) -> Self {
        let organizations = results
            .iter()
            .map(|r| OrganizationEntry {
                organization: &r.organization,
                index: r.index,
                duration_ms: r.duration.as_millis() as u64,
                error: r.error.as_ref().map(|e| e.to_string()),
                best: r.best.as_ref(),
                logos: &r.logos,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            stats: RunStats::from_results(results, elapsed),
            organizations,
        }
    }
}

/// Pretty-printed JSON for a run.
pub fn to_json(results: &[OrganizationResult], elapsed: Duration) -> Result<String> {
    serde_json::to_string_pretty(&ReportDocument::new(results, elapsed))
        .map_err(|e| LogoCrawlerError::Report(format!("JSON serialization failed: {e}")))
}

/// Write the JSON export to `path`.
#[instrument(skip(results), fields(path = %path.display(), organizations = results.len()))]
pub fn write_json_report(
    path: &Path,
    results: &[OrganizationResult],
    elapsed: Duration,
) -> Result<()> {
    let json = to_json(results, elapsed)?;
    write_atomic(path, &json)?;
    info!("JSON export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_results, temp_dir};

    #[test]
    fn export_has_stats_and_organizations_in_order() {
        let json = to_json(&sample_results(), Duration::from_secs(3)).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["stats"]["total"], 3);
        assert_eq!(value["stats"]["total_ms"], 3000);

        let orgs = value["organizations"].as_array().expect("array");
        assert_eq!(orgs.len(), 3);
        assert_eq!(orgs[0]["organization"], "Acme <Corp>");
        assert_eq!(orgs[0]["best"]["url"], "https://acme.com/logo.png");
        assert_eq!(orgs[0]["logos"].as_array().unwrap().len(), 2);
        assert!(orgs[0].get("error").is_none());

        assert!(orgs[1]["best"].is_null());
        assert!(
            orgs[2]["error"]
                .as_str()
                .unwrap()
                .contains("panic occurred")
        );
    }

    #[test]
    fn writes_file() {
        let dir = temp_dir("lc-json-test");
        let path = dir.join("out").join("results.json");

        write_json_report(&path, &sample_results(), Duration::from_secs(1)).expect("write");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"organizations\""));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
