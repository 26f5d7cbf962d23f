//! Progress callbacks for batch runs.

use std::time::Duration;

use logocrawler_shared::OrganizationResult;

/// Observer for a batch run. Called from the task driving the batch.
pub trait BatchProgress: Send + Sync {
    /// The batch is about to start.
    fn started(&self, total: usize, workers: usize);

    /// One organization finished. `completed` counts results seen so far.
    fn organization_done(&self, result: &OrganizationResult, completed: usize, total: usize);

    /// Every organization has a result.
    fn finished(&self, elapsed: Duration);
}

/// Progress sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl BatchProgress for SilentProgress {
    fn started(&self, _total: usize, _workers: usize) {}
    fn organization_done(&self, _result: &OrganizationResult, _completed: usize, _total: usize) {}
    fn finished(&self, _elapsed: Duration) {}
}
