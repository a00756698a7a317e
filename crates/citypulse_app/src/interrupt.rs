//! Ctrl-C handling: the first interrupt stops cleanly, the second one quits.
use std::future::Future;
use std::io;

use citypulse_logging::{pulse_error, pulse_warn};
use tokio_util::sync::CancellationToken;

/// Exit status of a process ended by a second interrupt.
pub const FORCED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// The signal handler could not be installed or failed.
    Unavailable,
    /// A second interrupt arrived after cancellation was requested.
    ForceQuit,
}

/// Waits on `signal`, cancels `cancel` on the first interrupt and returns on the second.
pub async fn watch<F, Fut>(mut signal: F, cancel: CancellationToken) -> Interrupt
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(err) = signal().await {
        pulse_error!("Cannot listen for interrupts: {err}");
        return Interrupt::Unavailable;
    }
    pulse_warn!("Interrupt received, stopping after the current step (Ctrl-C again to quit)");
    cancel.cancel();

    match signal().await {
        Ok(()) => {
            pulse_warn!("Second interrupt, quitting now");
            Interrupt::ForceQuit
        }
        Err(err) => {
            pulse_error!("Cannot listen for interrupts: {err}");
            Interrupt::Unavailable
        }
    }
}
