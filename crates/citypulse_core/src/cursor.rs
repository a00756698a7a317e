use std::fmt;

use chrono::DateTime;

use crate::RawRecord;

/// Inclusive upper bound of the part of a source that is still to be harvested.
///
/// Every record whose key is strictly greater than the cursor is either
/// persisted or absent from the source. The cursor is never stored; it is
/// recomputed from the oldest persisted record on every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(i64);

impl Cursor {
    pub const fn new(key: i64) -> Self {
        Self(key)
    }

    pub const fn key(self) -> i64 {
        self.0
    }

    /// Resume position for a store whose oldest record has `oldest_stored` as key.
    ///
    /// The bound is inclusive, so records sharing the oldest key are requested
    /// again and filtered by the dedup check.
    pub fn resume_from(oldest_stored: Option<i64>) -> Option<Self> {
        oldest_stored.map(Self)
    }

    /// Value for sources whose `before` parameter is exclusive.
    pub fn exclusive_before(self) -> i64 {
        self.0.saturating_add(1)
    }

    pub fn admits(self, key: i64) -> bool {
        key <= self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(self.0, 0) {
            Some(at) => write!(f, "{} ({})", self.0, at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Next boundary after observing `batch`, or `None` for an empty batch.
///
/// Progress follows what the source returned, not what was inserted: a batch
/// of already-known records still moves the boundary past its oldest key.
pub fn advance(current: Option<Cursor>, batch: &[RawRecord]) -> Option<Cursor> {
    let oldest = batch.iter().map(|record| record.sort_key).min()?;
    Some(advance_past(current, oldest))
}

/// Boundary after a full page that held new records: stays on `oldest_key`.
///
/// The page may have cut through a run of records sharing that key, so the key
/// is requested again and the already stored ties are filtered by dedup.
pub fn hold_at(current: Option<Cursor>, oldest_key: i64) -> Cursor {
    match current {
        Some(cursor) => Cursor(oldest_key.min(cursor.0)),
        None => Cursor(oldest_key),
    }
}

/// One unit past `oldest_key`, never at or above `current`.
pub fn advance_past(current: Option<Cursor>, oldest_key: i64) -> Cursor {
    let next = oldest_key.saturating_sub(1);
    match current {
        Some(cursor) => Cursor(next.min(cursor.0.saturating_sub(1))),
        None => Cursor(next),
    }
}
