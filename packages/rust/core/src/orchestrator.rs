//! Batch orchestration: a bounded worker pool over the organization list.
//!
//! Workers pull `(index, organization)` pairs from a shared queue and run
//! each organization in its own task, so a panic is contained to that
//! organization. Results stream back over a channel and are slotted by
//! index, so the returned list always follows input order.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use logocrawler_shared::{LogoCrawlerError, OrganizationResult, SizePreference};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

use crate::pipeline::OrganizationProcessor;
use crate::progress::BatchProgress;

/// Runs a processor over many organizations with at most `max_workers`
/// in flight.
#[derive(Debug)]
pub struct Orchestrator<P> {
    processor: Arc<P>,
    max_workers: usize,
}

impl<P> Clone for Orchestrator<P> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
            max_workers: self.max_workers,
        }
    }
}

impl<P: OrganizationProcessor> Orchestrator<P> {
    /// `max_workers` is clamped to at least 1.
    pub fn new(processor: Arc<P>, max_workers: usize) -> Self {
        Self {
            processor,
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Process every organization and return one result per input, in
    /// input order.
    #[instrument(skip_all, fields(organizations = organizations.len(), workers = self.max_workers))]
    pub async fn run(
        &self,
        organizations: &[String],
        prefs: SizePreference,
        progress: &dyn BatchProgress,
    ) -> Vec<OrganizationResult> {
        let total = organizations.len();
        let start = Instant::now();
        let workers = self.max_workers.min(total.max(1));
        progress.started(total, workers);
        info!(organizations = total, workers, "batch started");

        if total == 0 {
            progress.finished(start.elapsed());
            return Vec::new();
        }

        let queue: VecDeque<(usize, String)> = organizations
            .iter()
            .cloned()
            .enumerate()
            .collect();
        let queue = Arc::new(Mutex::new(queue));
        let (tx, mut rx) = mpsc::unbounded_channel::<OrganizationResult>();

        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let processor = Arc::clone(&self.processor);

            handles.push(tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some((index, organization)) = next else {
                        break;
                    };
                    debug!(worker, index, %organization, "picked organization");

                    let processor = Arc::clone(&processor);
                    let result = process_isolated(processor, index, organization, prefs).await;
                    if tx.send(result).is_err() {
                        break;
                    }
                }
            }));
        }
        // Only the workers hold senders now; the channel closes when they finish.
        drop(tx);

        let mut slots: Vec<Option<OrganizationResult>> =
            std::iter::repeat_with(|| None).take(total).collect();
        let mut completed = 0;
        while let Some(result) = rx.recv().await {
            completed += 1;
            progress.organization_done(&result, completed, total);
            let index = result.index;
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(result);
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "worker task ended abnormally");
            }
        }

        let results: Vec<OrganizationResult> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    OrganizationResult::failure(
                        organizations[index].clone(),
                        index,
                        LogoCrawlerError::task("no result produced"),
                        std::time::Duration::ZERO,
                    )
                })
            })
            .collect();

        let elapsed = start.elapsed();
        info!(
            organizations = total,
            errors = results.iter().filter(|r| r.is_error()).count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "batch complete"
        );
        progress.finished(elapsed);
        results
    }
}

/// Run one organization in its own task and fold any fault into the result.
async fn process_isolated<P: OrganizationProcessor>(
    processor: Arc<P>,
    index: usize,
    organization: String,
    prefs: SizePreference,
) -> OrganizationResult {
    let start = Instant::now();
    let input = organization.clone();
    let outcome = tokio::spawn(async move { processor.process(&input, &prefs).await }).await;
    let duration = start.elapsed();

    match outcome {
        Ok(Ok(found)) => {
            OrganizationResult::success(organization, index, found.logos, found.best, duration)
        }
        Ok(Err(e)) => {
            warn!(%organization, error = %e, "organization failed");
            OrganizationResult::failure(organization, index, e, duration)
        }
        Err(e) => {
            let error = join_error(e);
            warn!(%organization, error = %error, "organization task faulted");
            OrganizationResult::failure(organization, index, error, duration)
        }
    }
}

fn join_error(e: JoinError) -> LogoCrawlerError {
    if e.is_panic() {
        let payload = e.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        LogoCrawlerError::task(format!("panic occurred: {message}"))
    } else {
        LogoCrawlerError::task("task cancelled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use logocrawler_shared::{LogoCrawlerError, Result, ValidatedLogo};

    use crate::pipeline::OrganizationLogos;
    use crate::progress::SilentProgress;

    const PREFS: SizePreference = SizePreference {
        min_width: 100,
        min_height: 100,
    };

    /// Processor with scripted behavior keyed on the input name.
    #[derive(Default)]
    struct FakeProcessor {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl OrganizationProcessor for FakeProcessor {
        fn process(
            &self,
            input: &str,
            _prefs: &SizePreference,
        ) -> impl Future<Output = Result<OrganizationLogos>> + Send {
            let input = input.to_string();
            async move {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);

                let delay = input
                    .strip_prefix("slow-")
                    .and_then(|ms| ms.parse::<u64>().ok())
                    .unwrap_or(5);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);

                if input == "explode" {
                    panic!("boom");
                }
                if input == "broken" {
                    return Err(LogoCrawlerError::Network("connection reset".into()));
                }

                let logo = ValidatedLogo::new(format!("https://{input}/logo.png"), 128, 128);
                Ok(OrganizationLogos {
                    domain: input.clone(),
                    logos: logo.clone().into_iter().collect(),
                    best: logo,
                })
            }
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    struct CountingProgress {
        done: AtomicUsize,
        finished: AtomicUsize,
    }

    impl BatchProgress for CountingProgress {
        fn started(&self, _total: usize, _workers: usize) {}
        fn organization_done(&self, _r: &OrganizationResult, completed: usize, _total: usize) {
            self.done.store(completed, Ordering::SeqCst);
        }
        fn finished(&self, _elapsed: Duration) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn results_follow_input_order() {
        let orchestrator = Orchestrator::new(Arc::new(FakeProcessor::default()), 4);
        let input = names(&["slow-80", "slow-40", "slow-10", "slow-1"]);

        let results = orchestrator.run(&input, PREFS, &SilentProgress).await;

        let got: Vec<_> = results.iter().map(|r| r.organization.as_str()).collect();
        assert_eq!(got, vec!["slow-80", "slow-40", "slow-10", "slow-1"]);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.index, i);
            assert!(!r.is_error());
            assert_eq!(r.logos.len(), 1);
        }
    }

    #[tokio::test]
    async fn panic_is_isolated_to_one_organization() {
        let orchestrator = Orchestrator::new(Arc::new(FakeProcessor::default()), 2);
        let input = names(&["a.com", "explode", "b.com"]);

        let results = orchestrator.run(&input, PREFS, &SilentProgress).await;

        assert_eq!(results.len(), 3);
        assert!(!results[0].is_error());
        assert!(!results[2].is_error());

        let faulted = &results[1];
        assert!(faulted.logos.is_empty());
        assert!(faulted.best.is_none());
        let message = faulted.error.as_ref().unwrap().to_string();
        assert!(message.contains("panic occurred"), "{message}");
        assert!(message.contains("boom"), "{message}");
    }

    #[tokio::test]
    async fn processor_error_is_recorded() {
        let orchestrator = Orchestrator::new(Arc::new(FakeProcessor::default()), 2);
        let input = names(&["broken", "ok.com"]);

        let results = orchestrator.run(&input, PREFS, &SilentProgress).await;

        assert!(matches!(
            results[0].error,
            Some(LogoCrawlerError::Network(_))
        ));
        assert!(results[0].logos.is_empty());
        assert!(results[1].best.is_some());
    }

    #[tokio::test]
    async fn never_exceeds_max_workers() {
        let processor = Arc::new(FakeProcessor::default());
        let orchestrator = Orchestrator::new(Arc::clone(&processor), 3);
        let input: Vec<String> = (0..12).map(|_| "slow-20".to_string()).collect();

        let results = orchestrator.run(&input, PREFS, &SilentProgress).await;

        assert_eq!(results.len(), 12);
        let peak = processor.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak {peak}");
        assert!(peak >= 2, "workers should overlap, peak {peak}");
    }

    #[tokio::test]
    async fn empty_input_reports_finish() {
        let orchestrator = Orchestrator::new(Arc::new(FakeProcessor::default()), 3);
        let progress = CountingProgress {
            done: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        };

        let results = orchestrator.run(&[], PREFS, &progress).await;

        assert!(results.is_empty());
        assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn progress_sees_every_result() {
        let orchestrator = Orchestrator::new(Arc::new(FakeProcessor::default()), 2);
        let progress = CountingProgress {
            done: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        };
        let input = names(&["a.com", "b.com", "explode", "c.com"]);

        orchestrator.run(&input, PREFS, &progress).await;

        assert_eq!(progress.done.load(Ordering::SeqCst), 4);
        assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn worker_count_is_at_least_one() {
        let orchestrator = Orchestrator::new(Arc::new(FakeProcessor::default()), 0);
        assert_eq!(orchestrator.max_workers(), 1);
    }
}
