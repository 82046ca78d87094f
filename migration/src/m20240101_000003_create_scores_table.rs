use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scores::User).string().not_null())
                    .col(ColumnDef::new(Scores::Round).uuid().not_null())
                    .col(
                        ColumnDef::new(Scores::Taps)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    // Composite key makes concurrent first-tap inserts
                    // collapse onto a single row
                    .primary_key(
                        Index::create()
                            .name("pk_scores_user_round")
                            .col(Scores::User)
                            .col(Scores::Round),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_user")
                            .from(Scores::Table, Scores::User)
                            .to(Users::Table, Users::Login),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_round")
                            .from(Scores::Table, Scores::Round)
                            .to(Rounds::Table, Rounds::Uuid),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on round for summary scans
        manager
            .create_index(
                Index::create()
                    .name("idx_scores_round")
                    .table(Scores::Table)
                    .col(Scores::Round)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scores {
    Table,
    User,
    Round,
    Taps,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Login,
}

#[derive(DeriveIden)]
enum Rounds {
    Table,
    Uuid,
}
