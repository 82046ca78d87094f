use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use round_core::{round_status, score_from_taps};
use round_persistence::entities::{prelude::*, scores};
use round_persistence::repositories::{RoundRepository, ScoreRepository};
use round_types::{Role, RoundStatus, RoundSummary, RoundWithStatus};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Round not found")]
    RoundNotFound,
    #[error("Round is not active")]
    RoundNotActive,
    #[error("Only admin users can create rounds")]
    AdminRequired,
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Detail view of a single round from one caller's perspective. The
/// summary is only present once the round has finished.
#[derive(Debug)]
pub struct RoundDetail {
    pub round: RoundWithStatus,
    pub current_user_score: i32,
    pub summary: Option<RoundSummary>,
}

/// Orchestrates the round lifecycle: tap processing against the score
/// ledger and assembly of round listings, details and summaries.
pub struct RoundEngine {
    db: DatabaseConnection,
    rounds: RoundRepository,
    scores: ScoreRepository,
    cooldown_seconds: u64,
    round_seconds: u64,
}

impl RoundEngine {
    pub fn new(db: DatabaseConnection, cooldown_seconds: u64, round_seconds: u64) -> Self {
        Self {
            rounds: RoundRepository::new(db.clone()),
            scores: ScoreRepository::new(db.clone()),
            db,
            cooldown_seconds,
            round_seconds,
        }
    }

    pub async fn list_rounds(&self) -> Result<Vec<RoundWithStatus>, EngineError> {
        Ok(self.rounds.list_unfinished().await?)
    }

    pub async fn create_round(&self, role: Role) -> Result<RoundWithStatus, EngineError> {
        if role != Role::Admin {
            return Err(EngineError::AdminRequired);
        }

        Ok(self
            .rounds
            .create_round(self.cooldown_seconds, self.round_seconds)
            .await?)
    }

    /// Process one tap. The whole state machine runs inside a single
    /// transaction: resolve the round, check it is active, create the
    /// score row if this is the user's first tap, then increment under
    /// an exclusive row lock so concurrent taps from the same user
    /// serialize and none of them is lost. A failure at any step rolls
    /// the transaction back; the engine never retries on its own.
    pub async fn tap(
        &self,
        username: &str,
        round_uuid: Uuid,
        role: Role,
    ) -> Result<i32, EngineError> {
        let txn = self.db.begin().await?;

        let round = Rounds::find_by_id(round_uuid)
            .one(&txn)
            .await?
            .ok_or(EngineError::RoundNotFound)?;

        let status = round_status(
            round.start_datetime.to_utc(),
            round.end_datetime.to_utc(),
            Utc::now(),
        );
        if status != RoundStatus::Active {
            return Err(EngineError::RoundNotActive);
        }

        let record = scores::ActiveModel {
            user: sea_orm::ActiveValue::Set(username.to_owned()),
            round: sea_orm::ActiveValue::Set(round_uuid),
            taps: sea_orm::ActiveValue::Set(0),
        };
        Scores::insert(record)
            .on_conflict(
                OnConflict::columns([scores::Column::User, scores::Column::Round])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let record = Scores::find_by_id((username.to_owned(), round_uuid))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Score record missing after upsert"))?;

        let taps = if role == Role::Exempt {
            // Exempt taps are acknowledged but never counted
            record.taps
        } else {
            let taps = record.taps + 1;
            let mut record: scores::ActiveModel = record.into();
            record.taps = sea_orm::ActiveValue::Set(taps);
            record.update(&txn).await?;
            taps
        };

        txn.commit().await?;
        Ok(score_from_taps(taps))
    }

    /// Assemble the detail view for one round. The caller's score row
    /// is created on first read (without incrementing), and the status
    /// driving both the payload and the summary decision is derived
    /// once, at a single instant.
    pub async fn round_detail(
        &self,
        round_uuid: Uuid,
        username: &str,
    ) -> Result<RoundDetail, EngineError> {
        let round = self
            .rounds
            .find_by_uuid(round_uuid)
            .await?
            .ok_or(EngineError::RoundNotFound)?;

        let record = self.scores.get_or_create(username, round_uuid).await?;

        let round = RoundRepository::with_status(&round, Utc::now());
        let summary = if round.status == RoundStatus::Finished {
            Some(self.scores.sum_and_best(round_uuid).await?)
        } else {
            None
        };

        Ok(RoundDetail {
            round,
            current_user_score: score_from_taps(record.taps),
            summary,
        })
    }
}
