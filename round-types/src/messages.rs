use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::round::{BestPlayer, RoundWithStatus};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TapRequest {
    #[serde(rename = "roundUuid")]
    pub round_uuid: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TapResponse {
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateRoundResponse {
    pub round: RoundWithStatus,
}

/// Detail payload for a round still in cooldown or active.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundDetailResponse {
    pub round: RoundWithStatus,
    #[serde(rename = "currentUserScore")]
    pub current_user_score: i32,
}

/// Detail payload for a finished round, including its results.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundFinishedResponse {
    pub round: RoundWithStatus,
    #[serde(rename = "currentUserScore")]
    pub current_user_score: i32,
    #[serde(rename = "totalScore")]
    pub total_score: i32,
    #[serde(rename = "bestPlayer")]
    pub best_player: Option<BestPlayer>,
}
