use std::time::Duration;

use async_trait::async_trait;
use citypulse_core::{FailurePolicy, ItemOutcome, SkipReason, Summary};
use uuid::Uuid;

use super::{EnrichError, Enrichment};
use crate::ratelimit::MinDelayLimiter;
use crate::retry::RetryPolicy;
use crate::sources::{PageSummary, SummaryLookup};
use crate::store::{Store, StoreError};
use crate::FetchError;

pub const SUMMARY_MIN_DELAY: Duration = Duration::from_millis(6);
pub const SUMMARY_RETRY_DELAY: Duration = Duration::from_millis(10);
pub const SUMMARY_ATTEMPTS: u32 = 3;

/// Encyclopedia summaries for cities, most mentioned first.
pub struct Summaries<S> {
    lookup: S,
    pacer: MinDelayLimiter,
    retry: RetryPolicy,
}

impl<S: SummaryLookup> Summaries<S> {
    pub fn new(lookup: S) -> Self {
        Self {
            lookup,
            pacer: MinDelayLimiter::new(SUMMARY_MIN_DELAY),
            retry: RetryPolicy::new(SUMMARY_ATTEMPTS, SUMMARY_RETRY_DELAY),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait(?Send)]
impl<S: SummaryLookup> Enrichment for Summaries<S> {
    type Item = String;
    type Output = Summary;
    type Error = FetchError;

    fn label(&self) -> &'static str {
        "summaries"
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }

    fn frontier(&self, store: &Store) -> Result<Vec<String>, StoreError> {
        store.cities_without_summary()
    }

    fn load(&self, store: &Store, key: &str) -> Result<Option<String>, StoreError> {
        store.city_name(key)
    }

    async fn compute(&mut self, city: &String) -> ItemOutcome<Summary, FetchError> {
        self.pacer.wait().await;
        let lookup = &self.lookup;
        let title = city.as_str();
        match self.retry.run("summary lookup", || lookup.summarize(title)).await {
            Ok(PageSummary::Standard(summary)) => ItemOutcome::Ok(summary),
            Ok(PageSummary::Other { kind }) => ItemOutcome::Skipped(SkipReason::Unusable { kind }),
            Err(err) => ItemOutcome::Failed(err),
        }
    }

    async fn write(
        &self,
        store: &Store,
        retry: &RetryPolicy,
        _run: Option<&Uuid>,
        key: &str,
        summary: Summary,
    ) -> Result<u64, EnrichError> {
        let summary = &summary;
        let updated = retry
            .run("store summary", || async move { store.set_summary(key, summary) })
            .await?;
        Ok(u64::from(updated))
    }
}
