//! Bounded polling used to observe commands the daemon applies asynchronously.

use std::{thread, time::Duration};

use tracing::trace;

use deluge_console_types::ConsoleError;

/// Retry budget for observing the effect of an `add` or `del` command.
///
/// The state is checked once immediately, then up to `retries` more times with
/// `interval` between checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Checks made after the first one.
    pub retries: u32,
    /// Delay before each retry.
    pub interval: Duration,
}

impl PollSchedule {
    /// Create a schedule with `retries` extra checks spaced by `interval`.
    pub const fn new(retries: u32, interval: Duration) -> Self {
        Self { retries, interval }
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}

/// Observe state until `done` holds or the schedule runs out, returning the last
/// observation. Errors from `observe` end polling immediately.
pub(crate) fn poll_until<T, O, D>(
    schedule: &PollSchedule,
    mut observe: O,
    done: D,
) -> Result<T, ConsoleError>
where
    O: FnMut() -> Result<T, ConsoleError>,
    D: Fn(&T) -> bool,
{
    let mut state = observe()?;
    let mut remaining = schedule.retries;
    while !done(&state) && remaining > 0 {
        remaining -= 1;
        trace!(remaining, "Condition not met, retrying");
        thread::sleep(schedule.interval);
        state = observe()?;
    }
    Ok(state)
}
