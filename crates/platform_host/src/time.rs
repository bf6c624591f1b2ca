//! Millisecond clocks shared by the stores and the persistence envelope.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_ISSUED_MS: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Returns a unix millisecond timestamp that is strictly increasing within
/// the current thread, even when the system clock does not advance between
/// calls. Item `created`/`modified` stamps and envelope update times rely on
/// this so that ordering comparisons stay meaningful in a single session.
pub fn next_monotonic_ms() -> u64 {
    let now = unix_time_ms_now();
    LAST_ISSUED_MS.with(|last| {
        let next = now.max(last.get().saturating_add(1));
        last.set(next);
        next
    })
}
