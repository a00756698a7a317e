//! Frontier-driven enrichment of stored data.
//!
//! Each task reads the keys it has not processed yet, computes an output per
//! key through a remote provider or model and writes it back. The frontier is
//! snapshotted once per run, so items without a result are attempted again on
//! the next run instead of looping within this one.
use std::fmt::Display;

use async_trait::async_trait;
use citypulse_core::{Disposition, EnrichStats, FailurePolicy, ItemOutcome, SkipReason};
use citypulse_logging::{pulse_debug, pulse_info, pulse_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::retry::RetryPolicy;
use crate::store::{Store, StoreError};
use crate::{NullProgress, ProgressEvent, ProgressSink};

mod entities;
mod geocoding;
mod summaries;

pub use entities::{EntityExtraction, DEFAULT_ENTITY_LABELS};
pub use geocoding::{Geocoding, GEOCODE_MIN_DELAY};
pub use summaries::{Summaries, SUMMARY_ATTEMPTS, SUMMARY_MIN_DELAY, SUMMARY_RETRY_DELAY};

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{task} wrote before its run was created")]
    MissingRun { task: &'static str },
    #[error("{task} failed on {key}: {message}")]
    Item {
        task: &'static str,
        key: String,
        message: String,
    },
}

#[async_trait(?Send)]
pub trait Enrichment {
    type Item;
    type Output;
    type Error: Display;

    fn label(&self) -> &'static str;

    fn failure_policy(&self) -> FailurePolicy;

    /// Record a run identity before the first item; tasks without runs keep the default.
    async fn begin_run(
        &mut self,
        _store: &Store,
        _retry: &RetryPolicy,
    ) -> Result<Option<Uuid>, StoreError> {
        Ok(None)
    }

    /// Keys still lacking this task's output, in processing order.
    fn frontier(&self, store: &Store) -> Result<Vec<String>, StoreError>;

    fn load(&self, store: &Store, key: &str) -> Result<Option<Self::Item>, StoreError>;

    async fn compute(&mut self, item: &Self::Item) -> ItemOutcome<Self::Output, Self::Error>;

    /// Persist `output` for `key`; returns the number of rows written.
    async fn write(
        &self,
        store: &Store,
        retry: &RetryPolicy,
        run: Option<&Uuid>,
        key: &str,
        output: Self::Output,
    ) -> Result<u64, EnrichError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    pub task: &'static str,
    pub run: Option<Uuid>,
    pub stats: EnrichStats,
    pub interrupted: bool,
}

static NO_PROGRESS: NullProgress = NullProgress;

pub struct EnrichmentLoop<'a> {
    store: &'a Store,
    retry: RetryPolicy,
    progress: &'a dyn ProgressSink,
    cancel: CancellationToken,
}

impl<'a> EnrichmentLoop<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            retry: RetryPolicy::default(),
            progress: &NO_PROGRESS,
            cancel: CancellationToken::new(),
        }
    }

    /// Retry applied to store reads and writes.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Cancellation is honored between items.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn run<T: Enrichment>(&self, task: &mut T) -> Result<EnrichReport, EnrichError> {
        let label = task.label();
        let store = self.store;
        let run = task.begin_run(store, &self.retry).await?;
        if let Some(run) = &run {
            pulse_info!("{label}: recording run {run}");
        }

        let view: &T = &*task;
        let keys = self
            .retry
            .run("load frontier", || async move { view.frontier(store) })
            .await?;

        let mut stats = EnrichStats {
            frontier: keys.len() as u64,
            ..EnrichStats::default()
        };
        pulse_info!("{label}: {} items to process", stats.frontier);
        self.progress.emit(ProgressEvent::Started {
            label,
            total: Some(stats.frontier),
        });

        let mut interrupted = false;
        for key in &keys {
            if self.cancel.is_cancelled() {
                pulse_info!("{label}: interrupted after {} items", stats.processed);
                interrupted = true;
                break;
            }

            let view: &T = &*task;
            let key_ref = key.as_str();
            let item = self
                .retry
                .run("load item", || async move { view.load(store, key_ref) })
                .await?;
            stats.processed += 1;

            let outcome = match item {
                Some(item) => task.compute(&item).await,
                None => ItemOutcome::Skipped(SkipReason::Missing),
            };
            match task.failure_policy().dispose(outcome) {
                Disposition::Write(output) => {
                    stats.rows_written += task
                        .write(store, &self.retry, run.as_ref(), key, output)
                        .await?;
                }
                Disposition::Skip(reason) => {
                    stats.skipped += 1;
                    pulse_debug!("{label}: skipped {key}: {reason}");
                }
                Disposition::Tolerate(err) => {
                    stats.failed += 1;
                    pulse_warn!("{label}: {key} failed: {err}");
                }
                Disposition::Abort(err) => {
                    return Err(EnrichError::Item {
                        task: label,
                        key: key.clone(),
                        message: err.to_string(),
                    });
                }
            }

            self.progress.emit(ProgressEvent::Advanced {
                completed: stats.processed,
            });
        }

        self.progress.emit(ProgressEvent::Finished);
        pulse_info!(
            "{label}: {} processed, {} rows written, {} skipped, {} failed",
            stats.processed,
            stats.rows_written,
            stats.skipped,
            stats.failed
        );
        Ok(EnrichReport {
            task: label,
            run,
            stats,
            interrupted,
        })
    }
}
