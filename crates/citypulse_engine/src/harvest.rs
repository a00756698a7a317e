//! Backward comment harvest: executes the effects of the core state machine.
use std::collections::VecDeque;
use std::time::Duration;

use citypulse_core::{
    estimated_calls, update, BatchSummary, Cursor, HarvestEffect, HarvestMsg, HarvestPhase,
    HarvestState, HarvestStats, RawRecord, StopReason, DEFAULT_CEILING_MULTIPLIER, MAX_PAGE_SIZE,
};
use citypulse_logging::{pulse_debug, pulse_info};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::ratelimit::IntervalPacer;
use crate::retry::RetryPolicy;
use crate::sources::CommentSource;
use crate::store::{Store, StoreError};
use crate::{FetchError, NullProgress, ProgressEvent, ProgressSink};

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub page_size: usize,
    /// Minimum wall-clock time of one fetch-and-write iteration.
    pub target_interval: Duration,
    pub ceiling_multiplier: u64,
    /// Retry around the advisory remaining-count request.
    pub count_retry: RetryPolicy,
    /// Retry around remote page requests.
    pub fetch_retry: RetryPolicy,
    /// Retry around store reads and writes.
    pub store_retry: RetryPolicy,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            target_interval: Duration::from_millis(600),
            ceiling_multiplier: DEFAULT_CEILING_MULTIPLIER,
            count_retry: RetryPolicy::default(),
            fetch_retry: RetryPolicy::default().with_delay(Duration::from_secs(5)),
            store_retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub stop: StopReason,
    /// Inclusive upper bound of the next page the harvest would request.
    pub cursor: Option<Cursor>,
    pub iterations: u64,
    pub expected_calls: Option<u64>,
    pub stats: HarvestStats,
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("comment source: {0}")]
    Source(#[from] FetchError),
    #[error("harvest stalled in {0:?}")]
    Stalled(HarvestPhase),
}

/// Where a harvest over `store` resumes: just at the oldest stored key.
pub fn current_boundary(store: &Store) -> Result<Option<Cursor>, StoreError> {
    Ok(Cursor::resume_from(store.oldest_comment_key()?))
}

static NO_PROGRESS: NullProgress = NullProgress;

pub struct HarvestLoop<'a, S: ?Sized> {
    source: &'a S,
    store: &'a Store,
    settings: HarvestSettings,
    progress: &'a dyn ProgressSink,
    cancel: CancellationToken,
}

impl<'a, S> HarvestLoop<'a, S>
where
    S: CommentSource + ?Sized,
{
    pub fn new(source: &'a S, store: &'a Store, settings: HarvestSettings) -> Self {
        Self {
            source,
            store,
            settings,
            progress: &NO_PROGRESS,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Cancellation is honored before each page request.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn run(&self) -> Result<HarvestReport, HarvestError> {
        let initial = HarvestState::new(self.settings.page_size, self.settings.ceiling_multiplier);
        let (mut state, effects) = update(initial, HarvestMsg::Started);
        let mut queue: VecDeque<HarvestEffect> = effects.into();
        let mut pacer = IntervalPacer::new(self.settings.target_interval);
        let mut batch: Vec<RawRecord> = Vec::new();

        while let Some(effect) = queue.pop_front() {
            let msg = match effect {
                HarvestEffect::LoadBound => {
                    let store = self.store;
                    let bound = self
                        .settings
                        .store_retry
                        .run("load harvest bound", || async move { current_boundary(store) })
                        .await?;
                    match bound {
                        Some(cursor) => pulse_info!("Resuming harvest at {cursor}"),
                        None => pulse_info!("Empty store, harvesting from the newest comment"),
                    }
                    HarvestMsg::BoundLoaded(bound)
                }
                HarvestEffect::CountRemaining { before } => {
                    let source = self.source;
                    let remaining = self
                        .settings
                        .count_retry
                        .run("count remaining", || source.count_before(before))
                        .await?;
                    let calls = estimated_calls(remaining, state.page_size());
                    pulse_info!("{remaining} comments remaining, about {calls} requests");
                    self.progress.emit(ProgressEvent::Started {
                        label: "comments",
                        total: Some(calls),
                    });
                    HarvestMsg::RemainingCounted(remaining)
                }
                HarvestEffect::FetchBatch { before, size } => {
                    if self.cancel.is_cancelled() {
                        HarvestMsg::Interrupted
                    } else {
                        pacer.begin();
                        let source = self.source;
                        batch = self
                            .settings
                            .fetch_retry
                            .run("fetch comment page", || source.fetch_page(before, size))
                            .await?;
                        let any_new = self.any_new(&batch).await?;
                        let summary = BatchSummary::of(&batch, any_new);
                        pulse_debug!(
                            "Page of {} comments, oldest {:?}, new: {any_new}",
                            summary.len,
                            summary.oldest_key
                        );
                        HarvestMsg::BatchFetched(summary)
                    }
                }
                HarvestEffect::WriteNew => {
                    let (inserted, duplicates) = self.write_new(&batch).await?;
                    HarvestMsg::BatchWritten {
                        inserted,
                        duplicates,
                    }
                }
                HarvestEffect::Throttle => {
                    pacer.finish().await;
                    self.progress.emit(ProgressEvent::Advanced {
                        completed: state.iterations(),
                    });
                    HarvestMsg::Throttled
                }
                HarvestEffect::Stop(reason) => {
                    self.progress.emit(ProgressEvent::Finished);
                    let report = HarvestReport {
                        stop: reason,
                        cursor: state.cursor(),
                        iterations: state.iterations(),
                        expected_calls: state.expected_calls(),
                        stats: state.stats(),
                    };
                    match report.cursor {
                        Some(cursor) => pulse_info!("Harvest stopped ({reason}) at {cursor}"),
                        None => pulse_info!("Harvest stopped ({reason})"),
                    }
                    return Ok(report);
                }
            };

            let (next, effects) = update(state, msg);
            state = next;
            queue.extend(effects);
        }

        Err(HarvestError::Stalled(state.phase()))
    }

    /// True as soon as one record of the batch is missing from the store.
    async fn any_new(&self, batch: &[RawRecord]) -> Result<bool, StoreError> {
        for record in batch {
            if !self.exists(&record.id).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        let store = self.store;
        self.settings
            .store_retry
            .run("comment lookup", || async move { store.comment_exists(id) })
            .await
    }

    /// Insert the records not yet stored; returns `(inserted, duplicates)`.
    async fn write_new(&self, batch: &[RawRecord]) -> Result<(u64, u64), StoreError> {
        let store = self.store;
        let mut inserted = 0;
        let mut duplicates = 0;
        for record in batch {
            if self.exists(&record.id).await? {
                duplicates += 1;
                continue;
            }
            let fresh = self
                .settings
                .store_retry
                .run("insert comment", || async move { store.insert_comment(record) })
                .await?;
            if fresh {
                inserted += 1;
            } else {
                duplicates += 1;
            }
        }
        Ok((inserted, duplicates))
    }
}
