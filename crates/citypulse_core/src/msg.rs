use crate::{Cursor, RawRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestMsg {
    /// Store is open; begin the run.
    Started,
    /// Oldest stored boundary, `None` for an empty store.
    BoundLoaded(Option<Cursor>),
    /// Advisory number of records remaining before the boundary.
    RemainingCounted(u64),
    BatchFetched(BatchSummary),
    BatchWritten { inserted: u64, duplicates: u64 },
    Throttled,
    /// User asked to stop; checked between iterations.
    Interrupted,
}

/// What the state machine needs to know about a fetched batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub len: usize,
    pub oldest_key: Option<i64>,
    /// At least one record id is absent from the store.
    pub any_new: bool,
}

impl BatchSummary {
    pub fn of(batch: &[RawRecord], any_new: bool) -> Self {
        Self {
            len: batch.len(),
            oldest_key: batch.iter().map(|record| record.sort_key).min(),
            any_new,
        }
    }
}
