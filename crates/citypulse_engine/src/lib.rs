//! Citypulse engine: store, remote providers and the loops that drive them.
mod enrich;
mod export;
mod harvest;
mod http;
mod ner;
mod persist;
mod ratelimit;
mod retry;
mod sources;
mod store;
mod types;

pub use enrich::{
    EnrichError, EnrichReport, Enrichment, EnrichmentLoop, EntityExtraction, Geocoding,
    Summaries, DEFAULT_ENTITY_LABELS, GEOCODE_MIN_DELAY, SUMMARY_ATTEMPTS, SUMMARY_MIN_DELAY,
    SUMMARY_RETRY_DELAY,
};
pub use export::{export_points, points, ExportError, ExportSummary, Point, DEFAULT_POINTS_PATH};
pub use harvest::{current_boundary, HarvestError, HarvestLoop, HarvestReport, HarvestSettings};
pub use http::{parse_base_url, HttpSettings, JsonClient};
pub use ner::{EntityRecognizer, ProcessRecognizer, RecognizerError};
pub use persist::{ensure_parent_dir, write_atomic, PersistError};
pub use ratelimit::{IntervalPacer, MinDelayLimiter};
pub use retry::{RetryPolicy, DEFAULT_ATTEMPTS, DEFAULT_DELAY};
pub use sources::{
    CommentSource, GeoNamesClient, Geocoder, PageSummary, PushshiftSource, SummaryLookup,
    WikipediaClient, DEFAULT_SUBREDDIT, GEONAMES_SEARCH_URL, PUSHSHIFT_COMMENT_SEARCH_URL,
    WIKIPEDIA_REST_URL,
};
pub use store::{City, Store, StoreError, DEFAULT_STORE_PATH};
pub use types::{FailureKind, FetchError, NullProgress, ProgressEvent, ProgressSink};
