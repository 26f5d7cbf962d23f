//! Application configuration for the logo crawler.
//!
//! Config lives in a TOML document (default `logocrawler.toml` in the working
//! directory). CLI flags override config file values, which override defaults.
//! Unlike optional tuning sections, `[preferred]` is mandatory: a config that
//! cannot supply the size preference is a fatal startup error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LogoCrawlerError, Result};
use crate::types::SizePreference;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "logocrawler.toml";

/// Upper bound for the default outer worker count.
pub const MAX_DEFAULT_WORKERS: usize = 10;

// ---------------------------------------------------------------------------
// Config structs (matching logocrawler.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Size preference used when scoring logos.
    pub preferred: SizePreference,

    /// Crawl tuning.
    #[serde(default)]
    pub crawl: CrawlSettings,

    /// Extra keywords for the candidate extraction heuristics.
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preferred: SizePreference {
                min_width: 120,
                min_height: 120,
            },
            crawl: CrawlSettings::default(),
            heuristics: HeuristicsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Worker count from config, or the host default when unset.
    pub fn max_workers(&self) -> usize {
        self.crawl.max_workers.unwrap_or_else(default_max_workers)
    }
}

/// `[crawl]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSettings {
    /// Number of organizations processed in parallel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
}

/// `[heuristics]` section. Entries extend the built-in lists, never replace them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    /// Extra keywords that mark an `<img>` as a brand logo.
    #[serde(default)]
    pub logo_keywords: Vec<String>,

    /// Extra keywords that mark an `<img>` as partner/ad/social imagery.
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}

/// Host parallelism capped at [`MAX_DEFAULT_WORKERS`].
pub fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_DEFAULT_WORKERS)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config from a specific file path.
///
/// Missing, unreadable, or malformed documents are errors; there is no
/// silent fallback to defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LogoCrawlerError::io(path, e))?;
    let config = parse_config(&content).map_err(|e| {
        LogoCrawlerError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(?path, "loaded config");
    Ok(config)
}

/// Parse and validate a TOML config document.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig =
        toml::from_str(content).map_err(|e| LogoCrawlerError::config(e.to_string()))?;

    if config.crawl.max_workers == Some(0) {
        return Err(LogoCrawlerError::config("crawl.max_workers must be at least 1"));
    }

    Ok(config)
}

/// Write a default config file to `path`. Refuses to overwrite.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(LogoCrawlerError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| LogoCrawlerError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| LogoCrawlerError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| LogoCrawlerError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
