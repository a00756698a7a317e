use serde::{Deserialize, Serialize};

/// An external entity as returned by a paginated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Stable external id, unique per table.
    pub id: String,
    /// Source-ordering scalar used for cursoring (creation time in seconds).
    pub sort_key: i64,
    /// Full raw payload as serialized JSON.
    pub payload: String,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, sort_key: i64, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sort_key,
            payload: payload.into(),
        }
    }
}

/// A named entity found in a text, with character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub label: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeHit {
    /// Provider id of the resolved location.
    pub id: String,
    /// Raw provider payload as serialized JSON.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub html: String,
    pub link: String,
}
