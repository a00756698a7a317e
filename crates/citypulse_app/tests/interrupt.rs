use std::io;

use citypulse_app::interrupt::{watch, Interrupt};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn second_interrupt_forces_quit_after_cancelling() {
    let cancel = CancellationToken::new();
    let mut seen = 0;
    let outcome = watch(
        || {
            seen += 1;
            async { Ok::<(), io::Error>(()) }
        },
        cancel.clone(),
    )
    .await;

    assert_eq!(outcome, Interrupt::ForceQuit);
    assert_eq!(seen, 2);
    assert!(cancel.is_cancelled());
}

#[tokio::test]
async fn missing_signal_handler_leaves_the_run_alone() {
    let cancel = CancellationToken::new();
    let outcome = watch(
        || async { Err::<(), io::Error>(io::Error::other("no signal support")) },
        cancel.clone(),
    )
    .await;

    assert_eq!(outcome, Interrupt::Unavailable);
    assert!(!cancel.is_cancelled());
}
