//! Shared types, error model, and configuration for the logo crawler.
//!
//! This crate is the foundation depended on by all other crates.
//! It provides:
//! - [`LogoCrawlerError`]: the unified error type
//! - Domain types ([`ValidatedLogo`], [`SizePreference`], [`OrganizationResult`])
//! - Configuration ([`AppConfig`], config loading) and input-list reading

pub mod config;
pub mod error;
pub mod input;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlSettings, DEFAULT_CONFIG_FILE, HeuristicsConfig, MAX_DEFAULT_WORKERS,
    default_max_workers, init_config, load_config_from, parse_config,
};
pub use error::{LogoCrawlerError, Result};
pub use input::{parse_organizations, read_organizations};
pub use types::{OrganizationResult, SizePreference, ValidatedLogo};
