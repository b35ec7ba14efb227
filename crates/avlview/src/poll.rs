//! Shared polling primitive for the watcher tasks.

use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// Run `probe` every `interval` until it yields a value, the `timeout`
/// elapses, or `cancel` fires. Returns `None` on timeout or cancellation.
///
/// The probe runs immediately on entry and again after each sleep; the final
/// sleep is shortened so the deadline is honored rather than overshot by up
/// to one interval.
pub(crate) async fn poll_until<T, F>(
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
    mut probe: F,
) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe() {
            return Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        let wait = interval.min(deadline - now);
        tokio::select! {
            () = cancel.cancelled() => return None,
            () = time::sleep(wait) => {}
        }
    }
}
