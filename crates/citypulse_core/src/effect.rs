use std::fmt;

use crate::Cursor;

/// Work the harvest driver must perform next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEffect {
    LoadBound,
    CountRemaining { before: Option<Cursor> },
    FetchBatch { before: Option<Cursor>, size: usize },
    /// Write the records of the batch just fetched that are not yet stored.
    WriteNew,
    Throttle,
    Stop(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source returned an empty batch.
    Exhausted,
    Interrupted,
    IterationCeiling,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "source exhausted"),
            StopReason::Interrupted => write!(f, "interrupted"),
            StopReason::IterationCeiling => write!(f, "iteration ceiling reached"),
        }
    }
}
