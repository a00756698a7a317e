use crate::{Cursor, StopReason};

/// Largest page the comment search API serves.
pub const MAX_PAGE_SIZE: usize = 100;

/// Iteration ceiling as a multiple of the estimated call count.
pub const DEFAULT_CEILING_MULTIPLIER: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestPhase {
    Init,
    FetchBound,
    CountRemaining,
    RequestBatch,
    Writing,
    Throttle,
    Stopped(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarvestStats {
    pub batches: u64,
    pub inserted: u64,
    /// Records of partially new batches that were already stored.
    pub duplicates: u64,
    pub all_known_batches: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestState {
    phase: HarvestPhase,
    cursor: Option<Cursor>,
    pending_cursor: Option<Cursor>,
    page_size: usize,
    ceiling_multiplier: u64,
    expected_calls: Option<u64>,
    max_iterations: Option<u64>,
    iterations: u64,
    stats: HarvestStats,
}

impl HarvestState {
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page_size: usize, ceiling_multiplier: u64) -> Self {
        Self {
            phase: HarvestPhase::Init,
            cursor: None,
            pending_cursor: None,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            ceiling_multiplier: ceiling_multiplier.max(1),
            expected_calls: None,
            max_iterations: None,
            iterations: 0,
            stats: HarvestStats::default(),
        }
    }

    pub fn phase(&self) -> HarvestPhase {
        self.phase
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn expected_calls(&self) -> Option<u64> {
        self.expected_calls
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn stats(&self) -> HarvestStats {
        self.stats
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.phase {
            HarvestPhase::Stopped(reason) => Some(reason),
            _ => None,
        }
    }

    pub(crate) fn set_phase(&mut self, phase: HarvestPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_cursor(&mut self, cursor: Option<Cursor>) {
        self.cursor = cursor;
    }

    pub(crate) fn hold_pending_cursor(&mut self, cursor: Cursor) {
        self.pending_cursor = Some(cursor);
    }

    pub(crate) fn commit_pending_cursor(&mut self) {
        if let Some(cursor) = self.pending_cursor.take() {
            self.cursor = Some(cursor);
        }
    }

    pub(crate) fn apply_count(&mut self, remaining: u64) {
        self.expected_calls = Some(estimated_calls(remaining, self.page_size));
        self.max_iterations = Some(iteration_ceiling(
            remaining,
            self.page_size,
            self.ceiling_multiplier,
        ));
    }

    pub(crate) fn record_iteration(&mut self) {
        self.iterations += 1;
        self.stats.batches += 1;
    }

    pub(crate) fn record_all_known(&mut self) {
        self.stats.all_known_batches += 1;
    }

    pub(crate) fn record_written(&mut self, inserted: u64, duplicates: u64) {
        self.stats.inserted += inserted;
        self.stats.duplicates += duplicates;
    }

    pub(crate) fn ceiling_reached(&self) -> bool {
        self.max_iterations.is_some_and(|max| self.iterations >= max)
    }
}

/// Number of page requests needed for `remaining` records.
pub fn estimated_calls(remaining: u64, page_size: usize) -> u64 {
    let size = page_size.max(1) as u64;
    remaining / size + 1
}

pub fn iteration_ceiling(remaining: u64, page_size: usize, multiplier: u64) -> u64 {
    estimated_calls(remaining, page_size).saturating_mul(multiplier.max(1))
}
