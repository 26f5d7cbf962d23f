//! Run reporting: statistics, the HTML report, and JSON export.

pub mod html;
pub mod json;
pub mod stats;

use std::path::Path;

use logocrawler_shared::{LogoCrawlerError, Result};
use tracing::debug;

pub use html::{default_report_path, render_html, write_html_report};
pub use json::{ReportDocument, to_json, write_json_report};
pub use stats::RunStats;

/// Write `content` to `path` via a sibling temp file and rename,
/// creating parent directories as needed.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir).map_err(|e| LogoCrawlerError::io(dir, e))?;
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LogoCrawlerError::Report(format!("invalid output path {path:?}")))?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| LogoCrawlerError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| LogoCrawlerError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote report file");
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;
    use std::time::Duration;

    use logocrawler_shared::{LogoCrawlerError, OrganizationResult, ValidatedLogo};

    pub(crate) fn logo(url: &str, w: u32, h: u32) -> ValidatedLogo {
        ValidatedLogo::new(url, w, h).expect("non-zero size")
    }

    /// Three organizations: one with two logos, one empty, one faulted.
    pub(crate) fn sample_results() -> Vec<OrganizationResult> {
        let best = logo("https://acme.com/logo.png", 150, 150);
        let icon = logo("https://acme.com/favicon.ico", 32, 32);
        vec![
            OrganizationResult::success(
                "Acme <Corp>",
                0,
                vec![best.clone(), icon],
                Some(best),
                Duration::from_millis(1200),
            ),
            OrganizationResult::success(
                "empty.org",
                1,
                Vec::new(),
                None,
                Duration::from_millis(300),
            ),
            OrganizationResult::failure(
                "broken.net",
                2,
                LogoCrawlerError::task("panic occurred: boom"),
                Duration::from_millis(10),
            ),
        ]
    }

    pub(crate) fn temp_dir(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::now_v7()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_temp() {
        let dir = testing::temp_dir("lc-write-test");
        let target = dir.join("a").join("b").join("out.txt");

        write_atomic(&target, "hello").expect("write");

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello");
        assert!(!target.with_file_name(".out.txt.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
