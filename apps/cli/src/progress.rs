//! Terminal progress bar for batch runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use logocrawler_core::BatchProgress;
use logocrawler_shared::OrganizationResult;

/// indicatif bar advanced once per finished organization.
pub(crate) struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    pub(crate) fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl BatchProgress for CliProgress {
    fn started(&self, total: usize, workers: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message(format!("{workers} workers"));
    }

    fn organization_done(&self, result: &OrganizationResult, completed: usize, _total: usize) {
        self.bar.set_position(completed as u64);
        self.bar.set_message(result.organization.clone());
    }

    fn finished(&self, _elapsed: Duration) {
        self.bar.finish_and_clear();
    }
}
