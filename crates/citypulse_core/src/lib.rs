//! Citypulse core: pure pipeline types and the harvest state machine.
mod cursor;
mod effect;
mod msg;
mod outcome;
mod record;
mod state;
mod update;

pub use cursor::{advance, advance_past, hold_at, Cursor};
pub use effect::{HarvestEffect, StopReason};
pub use msg::{BatchSummary, HarvestMsg};
pub use outcome::{Disposition, EnrichStats, FailurePolicy, ItemOutcome, SkipReason};
pub use record::{Entity, GeocodeHit, RawRecord, Summary};
pub use state::{
    estimated_calls, iteration_ceiling, HarvestPhase, HarvestState, HarvestStats,
    DEFAULT_CEILING_MULTIPLIER, MAX_PAGE_SIZE,
};
pub use update::update;
