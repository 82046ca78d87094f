use chrono::{DateTime, Duration, Utc};

use round_types::RoundStatus;

/// Derive a round's lifecycle state from its window and the current
/// clock. Both boundaries are inclusive on the active side, so a round
/// with `start == end == now` is active.
///
/// This is the single source of truth for round state. Every consumer
/// (list view, detail view, tap validation) must call it against the
/// stored timestamps instead of caching or persisting the result.
pub fn round_status(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> RoundStatus {
    if now < start {
        RoundStatus::Cooldown
    } else if now <= end {
        RoundStatus::Active
    } else {
        RoundStatus::Finished
    }
}

/// Compute the (start, end) window for a round created at `now`:
/// the round opens after the cooldown and stays active for the round
/// duration. Both offsets come from configuration, not from callers'
/// clocks, so the window is exact relative to a single `now`.
pub fn round_window(
    now: DateTime<Utc>,
    cooldown_seconds: u64,
    round_seconds: u64,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now + Duration::seconds(cooldown_seconds as i64);
    let end = start + Duration::seconds(round_seconds as i64);
    (start, end)
}
