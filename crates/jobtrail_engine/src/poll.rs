use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{ExtractError, Field};

/// Repeats `probe` every `interval` until it yields a value, `timeout` elapses,
/// or `cancel` fires. The first probe runs immediately.
pub async fn poll_until<T, F>(
    field: Field,
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
    mut probe: F,
) -> Result<T, ExtractError>
where
    F: FnMut() -> Option<T>,
{
    let deadline = Instant::now() + timeout;
    let mut ticker = time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExtractError::Cancelled { field }),
            _ = ticker.tick() => {
                if let Some(value) = probe() {
                    return Ok(value);
                }
            }
            _ = time::sleep_until(deadline) => {
                return Err(ExtractError::Timeout { field, after: timeout });
            }
        }
    }
}
