use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    /// The body is not the JSON shape the adapter expects.
    Decode,
    /// The provider reported an error inside a successful response.
    Provider { code: Option<i64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Provider { code: Some(code) } => write!(f, "provider error {code}"),
            FailureKind::Provider { code: None } => write!(f, "provider error"),
        }
    }
}

/// Progress notifications emitted by the harvest and enrichment loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started { label: &'static str, total: Option<u64> },
    Advanced { completed: u64 },
    Finished,
}

pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}

/// Discards progress; used where nothing is displayed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn emit(&self, _event: ProgressEvent) {}
}
