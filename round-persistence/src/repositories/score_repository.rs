use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, scores};
use round_core::score_from_taps;
use round_types::{BestPlayer, RoundSummary};

pub struct ScoreRepository {
    db: DatabaseConnection,
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch the score record for (user, round), creating it with zero
    /// taps on first access. The insert goes through the composite
    /// unique key with a do-nothing conflict clause, so concurrent
    /// first accesses collapse onto the same row instead of failing.
    pub async fn get_or_create(&self, username: &str, round_uuid: Uuid) -> Result<scores::Model> {
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
            .exec_without_returning(&self.db)
            .await?;

        Scores::find_by_id((username.to_owned(), round_uuid))
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Score record missing after upsert"))
    }

    /// Aggregate a round's score records into the finished-round
    /// summary. Scans every record on each call; acceptable while
    /// participant counts stay small.
    ///
    /// Ties keep the first record encountered with the maximum score.
    pub async fn sum_and_best(&self, round_uuid: Uuid) -> Result<RoundSummary> {
        let records = Scores::find()
            .filter(scores::Column::Round.eq(round_uuid))
            .all(&self.db)
            .await?;

        let mut total_score = 0;
        let mut best_player: Option<BestPlayer> = None;

        for record in records {
            let score = score_from_taps(record.taps);
            total_score += score;

            let is_better = best_player.as_ref().map_or(true, |best| score > best.score);
            if is_better {
                best_player = Some(BestPlayer {
                    username: record.user,
                    score,
                });
            }
        }

        Ok(RoundSummary {
            total_score,
            best_player,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::entities::rounds;
    use crate::repositories::{RoundRepository, UserRepository};
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use round_types::Role;
    use sea_orm::ActiveModelTrait;

    struct TestContext {
        db: DatabaseConnection,
        scores: ScoreRepository,
        round_uuid: Uuid,
    }

    async fn setup_test_context() -> TestContext {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let users = UserRepository::new(db.clone());
        for login in ["alice", "bob", "carol"] {
            users.create(login, "hash", Role::User).await.unwrap();
        }

        let now = Utc::now();
        let round = rounds::ActiveModel {
            uuid: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            created_at: sea_orm::ActiveValue::Set(now.into()),
            start_datetime: sea_orm::ActiveValue::Set(now.into()),
            end_datetime: sea_orm::ActiveValue::Set((now + Duration::seconds(60)).into()),
        };
        let round_uuid = round.insert(&db).await.unwrap().uuid;

        TestContext {
            scores: ScoreRepository::new(db.clone()),
            db,
            round_uuid,
        }
    }

    async fn set_taps(ctx: &TestContext, username: &str, taps: i32) {
        let record = ctx.scores.get_or_create(username, ctx.round_uuid).await.unwrap();
        let mut record: scores::ActiveModel = record.into();
        record.taps = sea_orm::ActiveValue::Set(taps);
        record.update(&ctx.db).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let ctx = setup_test_context().await;

        let first = ctx.scores.get_or_create("alice", ctx.round_uuid).await.unwrap();
        assert_eq!(first.taps, 0);

        let second = ctx.scores.get_or_create("alice", ctx.round_uuid).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_get_or_create_preserves_existing_taps() {
        let ctx = setup_test_context().await;

        set_taps(&ctx, "alice", 7).await;

        let record = ctx.scores.get_or_create("alice", ctx.round_uuid).await.unwrap();
        assert_eq!(record.taps, 7);
    }

    #[tokio::test]
    async fn test_sum_and_best_empty_round() {
        let ctx = setup_test_context().await;

        let summary = ctx.scores.sum_and_best(ctx.round_uuid).await.unwrap();
        assert_eq!(summary.total_score, 0);
        assert_eq!(summary.best_player, None);
    }

    #[tokio::test]
    async fn test_sum_and_best_applies_scoring_bonus() {
        let ctx = setup_test_context().await;

        // 11 taps score 20 points, 5 taps score 5
        set_taps(&ctx, "alice", 11).await;
        set_taps(&ctx, "bob", 5).await;

        let summary = ctx.scores.sum_and_best(ctx.round_uuid).await.unwrap();
        assert_eq!(summary.total_score, 25);
        assert_eq!(
            summary.best_player,
            Some(BestPlayer {
                username: "alice".to_string(),
                score: 20,
            })
        );
    }

    #[tokio::test]
    async fn test_sum_and_best_tie_keeps_first_record() {
        let ctx = setup_test_context().await;

        set_taps(&ctx, "alice", 5).await;
        set_taps(&ctx, "bob", 5).await;

        let summary = ctx.scores.sum_and_best(ctx.round_uuid).await.unwrap();
        assert_eq!(summary.total_score, 10);
        assert_eq!(summary.best_player.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_scores_are_scoped_to_their_round() {
        let ctx = setup_test_context().await;

        let rounds = RoundRepository::new(ctx.db.clone());
        let other_round = rounds.create_round(0, 60).await.unwrap();

        set_taps(&ctx, "alice", 3).await;
        ctx.scores.get_or_create("bob", other_round.uuid).await.unwrap();

        let summary = ctx.scores.sum_and_best(ctx.round_uuid).await.unwrap();
        assert_eq!(summary.total_score, 3);
        assert_eq!(summary.best_player.unwrap().username, "alice");
    }
}
