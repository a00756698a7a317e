//! Remote providers behind the harvest and enrichment loops.
use async_trait::async_trait;
use citypulse_core::{Cursor, GeocodeHit, RawRecord, Summary};

use crate::FetchError;

mod geonames;
mod pushshift;
mod wikipedia;

pub use geonames::{GeoNamesClient, GEONAMES_SEARCH_URL};
pub use pushshift::{PushshiftSource, DEFAULT_SUBREDDIT, PUSHSHIFT_COMMENT_SEARCH_URL};
pub use wikipedia::{WikipediaClient, WIKIPEDIA_REST_URL};

/// A paginated source read backwards in time.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Up to `size` records with keys at or below `before` (all records when
    /// `None`), newest first.
    async fn fetch_page(
        &self,
        before: Option<Cursor>,
        size: usize,
    ) -> Result<Vec<RawRecord>, FetchError>;

    /// Advisory number of records at or below `before`.
    async fn count_before(&self, before: Option<Cursor>) -> Result<u64, FetchError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeHit>, FetchError>;
}

/// Page summary as served by the encyclopedia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSummary {
    Standard(Summary),
    /// Disambiguation pages, missing articles and other non-standard kinds.
    Other { kind: String },
}

#[async_trait]
pub trait SummaryLookup: Send + Sync {
    async fn summarize(&self, title: &str) -> Result<PageSummary, FetchError>;
}
