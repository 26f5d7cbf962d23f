//! Logo discovery pipeline and batch orchestration.
//!
//! Ties resolution, candidate extraction, image validation, and scoring
//! into a per-organization pipeline, then fans that out over a worker pool.

pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod selector;

pub use orchestrator::Orchestrator;
pub use pipeline::{LogoPipeline, OrganizationLogos, OrganizationProcessor, PipelineOptions};
pub use progress::{BatchProgress, SilentProgress};
pub use selector::{LogoSelector, ScoringRules, order_best_first};
