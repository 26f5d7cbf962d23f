//! Self-contained HTML report, rendered from `templates/report.html`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use askama::Template;
use chrono::{DateTime, Local};
use logocrawler_shared::{LogoCrawlerError, OrganizationResult, Result};
use tracing::{info, instrument};

use crate::stats::RunStats;
use crate::write_atomic;

/// Directory used for reports when no output path is given.
pub const DEFAULT_REPORT_DIR: &str = "reports";

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    generated_at: String,
    cards: Vec<StatCard>,
    organizations: Vec<OrganizationView<'a>>,
}

struct StatCard {
    value: String,
    label: &'static str,
    is_error: bool,
}

struct OrganizationView<'a> {
    name: &'a str,
    duration: String,
    error: Option<String>,
    logos: Vec<LogoView<'a>>,
}

struct LogoView<'a> {
    url: &'a str,
    width: u32,
    height: u32,
    best: bool,
}

impl StatCard {
    fn new(value: impl ToString, label: &'static str) -> Self {
        Self {
            value: value.to_string(),
            label,
            is_error: false,
        }
    }
}

impl<'a> OrganizationView<'a> {
    fn from_result(result: &'a OrganizationResult) -> Self {
        let logos = result
            .logos
            .iter()
            .map(|logo| LogoView {
                url: logo.url(),
                width: logo.width(),
                height: logo.height(),
                best: result.is_best(logo),
            })
            .collect();

        Self {
            name: &result.organization,
            duration: format_duration(result.duration),
            error: result.error.as_ref().map(|e| e.to_string()),
            logos,
        }
    }
}

/// `reports/logo-crawler-report-<timestamp>.html`, relative to the working directory.
pub fn default_report_path() -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    Path::new(DEFAULT_REPORT_DIR).join(format!("logo-crawler-report-{stamp}.html"))
}

/// Render the full report document.
pub fn render_html(
    results: &[OrganizationResult],
    stats: &RunStats,
    generated_at: DateTime<Local>,
) -> Result<String> {
    let cards = vec![
        StatCard::new(stats.total, "Organizations"),
        StatCard::new(stats.with_logos, "With Logos"),
        StatCard {
            is_error: stats.errors > 0,
            ..StatCard::new(stats.errors, "Errors")
        },
        StatCard::new(stats.total_logos, "Total Logos"),
        StatCard::new(format!("{:.1}%", stats.success_rate), "Success Rate"),
        StatCard::new(format_duration(stats.total_duration), "Total Time"),
    ];

    let template = ReportTemplate {
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        cards,
        organizations: results.iter().map(OrganizationView::from_result).collect(),
    };

    template
        .render()
        .map_err(|e| LogoCrawlerError::Report(format!("HTML rendering failed: {e}")))
}

fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}ms", d.as_millis())
    }
}

/// Render and write the report to `path`.
#[instrument(skip(results), fields(path = %path.display(), organizations = results.len()))]
pub fn write_html_report(
    path: &Path,
    results: &[OrganizationResult],
    elapsed: Duration,
) -> Result<()> {
    let stats = RunStats::from_results(results, elapsed);
    let html = render_html(results, &stats, Local::now())?;
    write_atomic(path, &html)?;
    info!("HTML report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{logo, sample_results, temp_dir};

    fn render(results: &[OrganizationResult]) -> String {
        let stats = RunStats::from_results(results, Duration::from_secs(3));
        render_html(results, &stats, Local::now()).expect("render")
    }

    #[test]
    fn organization_names_are_escaped() {
        let html = render(&sample_results());
        assert!(html.contains("Acme &lt;Corp&gt;"));
        assert!(!html.contains("Acme <Corp>"));
    }

    #[test]
    fn logo_urls_cannot_break_out_of_attributes() {
        let hostile = logo(r#"https://evil.test/x.png"><script>alert(1)</script>"#, 64, 64);
        let results = vec![OrganizationResult::success(
            "evil.test",
            0,
            vec![hostile.clone()],
            Some(hostile),
            Duration::from_millis(5),
        )];

        let html = render(&results);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn best_logo_is_badged_once() {
        let html = render(&sample_results());
        assert_eq!(html.matches(r#"<span class="badge">BEST</span>"#).count(), 1);
        assert_eq!(html.matches(r#"class="logo-card best""#).count(), 1);
        assert!(html.contains("favicon.ico"));
        assert!(html.contains("150 × 150"));
    }

    #[test]
    fn sections_follow_input_order() {
        let html = render(&sample_results());
        let acme = html.find("Acme &lt;Corp&gt;").unwrap();
        let empty = html.find("empty.org").unwrap();
        let broken = html.find("broken.net").unwrap();
        assert!(acme < empty && empty < broken);
    }

    #[test]
    fn shows_errors_and_empty_organizations() {
        let html = render(&sample_results());
        assert!(html.contains("Error: task failed: panic occurred: boom"));
        assert!(html.contains("No valid logos found"));
        assert!(html.contains("33.3%"));
        assert!(html.contains(r#"class="stat-number error""#));
    }

    #[test]
    fn default_path_is_under_reports() {
        let path = default_report_path();
        assert!(path.starts_with(DEFAULT_REPORT_DIR));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("logo-crawler-report-"));
        assert!(name.ends_with(".html"));
    }

    #[test]
    fn writes_report_creating_directories() {
        let dir = temp_dir("lc-html-test");
        let path = dir.join("nested").join("report.html");

        write_html_report(&path, &sample_results(), Duration::from_secs(2)).expect("write");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("Logo Crawler Report"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
