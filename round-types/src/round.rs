use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Round lifecycle state. Always derived from the round's timestamps
/// at read time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RoundStatus {
    Cooldown,
    Active,
    Finished,
}

/// Round as it appears on the wire, with the status computed for the
/// moment the response was built.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundWithStatus {
    pub uuid: Uuid,
    pub created_at: String, // ISO 8601 string for simplicity
    pub start_datetime: String,
    pub end_datetime: String,
    pub status: RoundStatus,
}

/// Top scorer of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BestPlayer {
    pub username: String,
    pub score: i32,
}

/// Aggregate over all score records of a finished round. Computed
/// fresh on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub total_score: i32,
    pub best_player: Option<BestPlayer>,
}
