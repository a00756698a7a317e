use citypulse_core::{Disposition, FailurePolicy, ItemOutcome, SkipReason};

#[test]
fn no_result_is_a_skip_not_a_failure() {
    let outcome: ItemOutcome<u32, String> = Ok(None).into();
    assert_eq!(outcome, ItemOutcome::Skipped(SkipReason::NoMatch));
    assert_eq!(
        FailurePolicy::Abort.dispose(outcome),
        Disposition::Skip(SkipReason::NoMatch)
    );
}

#[test]
fn failures_follow_the_policy() {
    let failed = || ItemOutcome::<u32, String>::Failed("quota".to_string());

    assert_eq!(
        FailurePolicy::Continue.dispose(failed()),
        Disposition::Tolerate("quota".to_string())
    );
    assert_eq!(
        FailurePolicy::Abort.dispose(failed()),
        Disposition::Abort("quota".to_string())
    );
}

#[test]
fn values_are_written_under_either_policy() {
    for policy in [FailurePolicy::Continue, FailurePolicy::Abort] {
        let outcome: ItemOutcome<u32, String> = Ok(Some(7)).into();
        assert_eq!(policy.dispose(outcome), Disposition::Write(7));
    }
}

#[test]
fn skip_reasons_read_well_in_logs() {
    let reason = SkipReason::Unusable {
        kind: "disambiguation".to_string(),
    };
    assert_eq!(reason.to_string(), "unusable result of type disambiguation");
}
