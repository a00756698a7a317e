use crate::{
    advance_past, hold_at, BatchSummary, HarvestEffect, HarvestMsg, HarvestPhase, HarvestState,
    StopReason,
};

/// Pure harvest transition: applies a message to state and returns the effects to run.
///
/// Messages that do not belong to the current phase are ignored, and a stopped
/// state never produces further effects.
pub fn update(mut state: HarvestState, msg: HarvestMsg) -> (HarvestState, Vec<HarvestEffect>) {
    if state.stop_reason().is_some() {
        return (state, Vec::new());
    }

    let effects = match (state.phase(), msg) {
        (_, HarvestMsg::Interrupted) => stop(&mut state, StopReason::Interrupted),
        (HarvestPhase::Init, HarvestMsg::Started) => {
            state.set_phase(HarvestPhase::FetchBound);
            vec![HarvestEffect::LoadBound]
        }
        (HarvestPhase::FetchBound, HarvestMsg::BoundLoaded(bound)) => {
            state.set_cursor(bound);
            state.set_phase(HarvestPhase::CountRemaining);
            vec![HarvestEffect::CountRemaining { before: bound }]
        }
        (HarvestPhase::CountRemaining, HarvestMsg::RemainingCounted(remaining)) => {
            state.apply_count(remaining);
            request_batch(&mut state)
        }
        (HarvestPhase::RequestBatch, HarvestMsg::BatchFetched(summary)) => {
            match summary.oldest_key {
                None => stop(&mut state, StopReason::Exhausted),
                Some(oldest) => batch_fetched(&mut state, oldest, summary),
            }
        }
        (HarvestPhase::Writing, HarvestMsg::BatchWritten { inserted, duplicates }) => {
            state.record_written(inserted, duplicates);
            state.commit_pending_cursor();
            state.set_phase(HarvestPhase::Throttle);
            vec![HarvestEffect::Throttle]
        }
        (HarvestPhase::Throttle, HarvestMsg::Throttled) => {
            if state.ceiling_reached() {
                stop(&mut state, StopReason::IterationCeiling)
            } else {
                request_batch(&mut state)
            }
        }
        _ => Vec::new(),
    };

    (state, effects)
}

fn batch_fetched(
    state: &mut HarvestState,
    oldest: i64,
    summary: BatchSummary,
) -> Vec<HarvestEffect> {
    state.record_iteration();
    // A full page of new records may end inside a run of equal keys.
    let full = summary.len >= state.page_size();
    let next = if summary.any_new && full {
        hold_at(state.cursor(), oldest)
    } else {
        advance_past(state.cursor(), oldest)
    };
    if summary.any_new {
        state.hold_pending_cursor(next);
        state.set_phase(HarvestPhase::Writing);
        vec![HarvestEffect::WriteNew]
    } else {
        state.record_all_known();
        state.set_cursor(Some(next));
        state.set_phase(HarvestPhase::Throttle);
        vec![HarvestEffect::Throttle]
    }
}

fn request_batch(state: &mut HarvestState) -> Vec<HarvestEffect> {
    state.set_phase(HarvestPhase::RequestBatch);
    vec![HarvestEffect::FetchBatch {
        before: state.cursor(),
        size: state.page_size(),
    }]
}

fn stop(state: &mut HarvestState, reason: StopReason) -> Vec<HarvestEffect> {
    state.set_phase(HarvestPhase::Stopped(reason));
    vec![HarvestEffect::Stop(reason)]
}
