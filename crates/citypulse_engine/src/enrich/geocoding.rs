use std::time::Duration;

use async_trait::async_trait;
use citypulse_core::{FailurePolicy, GeocodeHit, ItemOutcome};
use uuid::Uuid;

use super::{EnrichError, Enrichment};
use crate::ratelimit::MinDelayLimiter;
use crate::retry::RetryPolicy;
use crate::sources::Geocoder;
use crate::store::{Store, StoreError};
use crate::FetchError;

/// 1000 requests per hour.
pub const GEOCODE_MIN_DELAY: Duration = Duration::from_millis(3600);

/// Resolves extracted location texts, most mentioned first.
pub struct Geocoding<G> {
    geocoder: G,
    limiter: MinDelayLimiter,
}

impl<G: Geocoder> Geocoding<G> {
    pub fn new(geocoder: G) -> Self {
        Self::with_limiter(geocoder, MinDelayLimiter::new(GEOCODE_MIN_DELAY))
    }

    pub fn with_limiter(geocoder: G, limiter: MinDelayLimiter) -> Self {
        Self { geocoder, limiter }
    }
}

#[async_trait(?Send)]
impl<G: Geocoder> Enrichment for Geocoding<G> {
    type Item = String;
    type Output = GeocodeHit;
    type Error = FetchError;

    fn label(&self) -> &'static str {
        "geocode"
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }

    fn frontier(&self, store: &Store) -> Result<Vec<String>, StoreError> {
        store.ungeocoded_texts()
    }

    fn load(&self, _store: &Store, key: &str) -> Result<Option<String>, StoreError> {
        Ok(Some(key.to_string()))
    }

    async fn compute(&mut self, text: &String) -> ItemOutcome<GeocodeHit, FetchError> {
        let geocoder = &self.geocoder;
        let query = text.as_str();
        self.limiter
            .call("geocode", || geocoder.geocode(query))
            .await
            .into()
    }

    async fn write(
        &self,
        store: &Store,
        retry: &RetryPolicy,
        _run: Option<&Uuid>,
        key: &str,
        hit: GeocodeHit,
    ) -> Result<u64, EnrichError> {
        let hit = &hit;
        let rows = retry
            .run("insert geocode", || async move { store.insert_geocode(key, hit) })
            .await?;
        Ok(rows as u64)
    }
}
