use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::entities::{prelude::*, rounds};
use round_core::{round_status, round_window};
use round_types::{RoundStatus, RoundWithStatus};

pub struct RoundRepository {
    db: DatabaseConnection,
}

impl RoundRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach the status derived at `now` to a stored round. Every
    /// consumer goes through here so list, detail and tap validation
    /// can never disagree about a round's state.
    pub fn with_status(model: &rounds::Model, now: DateTime<Utc>) -> RoundWithStatus {
        RoundWithStatus {
            uuid: model.uuid,
            created_at: model.created_at.to_rfc3339(),
            start_datetime: model.start_datetime.to_rfc3339(),
            end_datetime: model.end_datetime.to_rfc3339(),
            status: round_status(
                model.start_datetime.to_utc(),
                model.end_datetime.to_utc(),
                now,
            ),
        }
    }

    /// Creates a round opening after the cooldown and closing after the
    /// round duration, both offsets measured from a single `now`.
    pub async fn create_round(
        &self,
        cooldown_seconds: u64,
        round_seconds: u64,
    ) -> Result<RoundWithStatus> {
        let now = Utc::now();
        let (start, end) = round_window(now, cooldown_seconds, round_seconds);

        let round = rounds::ActiveModel {
            uuid: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            created_at: sea_orm::ActiveValue::Set(now.into()),
            start_datetime: sea_orm::ActiveValue::Set(start.into()),
            end_datetime: sea_orm::ActiveValue::Set(end.into()),
        };

        let saved = round.insert(&self.db).await?;
        Ok(Self::with_status(&saved, now))
    }

    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<rounds::Model>> {
        Ok(Rounds::find_by_id(uuid).one(&self.db).await?)
    }

    /// All rounds that have not finished yet (cooldown + active),
    /// newest-created first. The filter is re-evaluated against the
    /// clock on every call; a round may drop out between two calls.
    pub async fn list_unfinished(&self) -> Result<Vec<RoundWithStatus>> {
        let rounds = Rounds::find()
            .order_by_desc(rounds::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let now = Utc::now();
        Ok(rounds
            .iter()
            .map(|r| Self::with_status(r, now))
            .filter(|r| r.status != RoundStatus::Finished)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use chrono::Duration;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> RoundRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        RoundRepository::new(db)
    }

    async fn insert_round(
        repo: &RoundRepository,
        start_offset_seconds: i64,
        end_offset_seconds: i64,
    ) -> Uuid {
        let now = Utc::now();
        let round = rounds::ActiveModel {
            uuid: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            created_at: sea_orm::ActiveValue::Set(now.into()),
            start_datetime: sea_orm::ActiveValue::Set(
                (now + Duration::seconds(start_offset_seconds)).into(),
            ),
            end_datetime: sea_orm::ActiveValue::Set(
                (now + Duration::seconds(end_offset_seconds)).into(),
            ),
        };
        round.insert(&repo.db).await.unwrap().uuid
    }

    #[tokio::test]
    async fn test_create_round_window_offsets() {
        let repo = setup_test_db().await;

        let round = repo.create_round(30, 60).await.unwrap();
        assert_eq!(round.status, RoundStatus::Cooldown);

        let created = DateTime::parse_from_rfc3339(&round.created_at).unwrap();
        let start = DateTime::parse_from_rfc3339(&round.start_datetime).unwrap();
        let end = DateTime::parse_from_rfc3339(&round.end_datetime).unwrap();

        assert_eq!(start - created, Duration::seconds(30));
        assert_eq!(end - start, Duration::seconds(60));
    }

    #[tokio::test]
    async fn test_create_round_with_zero_cooldown_is_active() {
        let repo = setup_test_db().await;

        let round = repo.create_round(0, 60).await.unwrap();
        assert_eq!(round.status, RoundStatus::Active);
    }

    #[tokio::test]
    async fn test_find_by_uuid() {
        let repo = setup_test_db().await;

        let created = repo.create_round(30, 60).await.unwrap();
        let found = repo.find_by_uuid(created.uuid).await.unwrap().unwrap();
        assert_eq!(found.uuid, created.uuid);

        let missing = repo.find_by_uuid(Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_unfinished_excludes_finished_rounds() {
        let repo = setup_test_db().await;

        let finished = insert_round(&repo, -120, -60).await;
        let active = insert_round(&repo, -10, 50).await;
        let scheduled = insert_round(&repo, 60, 120).await;

        let rounds = repo.list_unfinished().await.unwrap();
        let uuids: Vec<Uuid> = rounds.iter().map(|r| r.uuid).collect();

        assert!(!uuids.contains(&finished));
        assert!(uuids.contains(&active));
        assert!(uuids.contains(&scheduled));

        for round in &rounds {
            assert_ne!(round.status, RoundStatus::Finished);
        }
    }
}
