use std::fmt;

/// Why an enrichment step produced nothing to write.
///
/// A skipped item keeps its place in the frontier and is attempted again on
/// the next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The provider has no result for the query.
    NoMatch,
    /// The provider answered with a result of an unusable kind.
    Unusable { kind: String },
    /// The frontier key no longer resolves to a stored item.
    Missing,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMatch => write!(f, "no match"),
            SkipReason::Unusable { kind } => write!(f, "unusable result of type {kind}"),
            SkipReason::Missing => write!(f, "item missing from store"),
        }
    }
}

/// Result of computing one enrichment item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<T, E> {
    Ok(T),
    Skipped(SkipReason),
    Failed(E),
}

impl<T, E> From<Result<Option<T>, E>> for ItemOutcome<T, E> {
    fn from(result: Result<Option<T>, E>) -> Self {
        match result {
            Ok(Some(value)) => ItemOutcome::Ok(value),
            Ok(None) => ItemOutcome::Skipped(SkipReason::NoMatch),
            Err(err) => ItemOutcome::Failed(err),
        }
    }
}

/// What an enrichment loop does with an item that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and move on to the next item.
    Continue,
    /// End the run with the failure.
    Abort,
}

/// Decision for one computed item under a [`FailurePolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition<T, E> {
    Write(T),
    Skip(SkipReason),
    Tolerate(E),
    Abort(E),
}

impl FailurePolicy {
    pub fn dispose<T, E>(self, outcome: ItemOutcome<T, E>) -> Disposition<T, E> {
        match outcome {
            ItemOutcome::Ok(value) => Disposition::Write(value),
            ItemOutcome::Skipped(reason) => Disposition::Skip(reason),
            ItemOutcome::Failed(err) => match self {
                FailurePolicy::Continue => Disposition::Tolerate(err),
                FailurePolicy::Abort => Disposition::Abort(err),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichStats {
    /// Size of the frontier snapshot taken at the start of the run.
    pub frontier: u64,
    pub processed: u64,
    pub rows_written: u64,
    pub skipped: u64,
    pub failed: u64,
}
