use anyhow::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

use crate::entities::{prelude::*, users};
use round_types::Role;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_login(&self, login: &str) -> Result<Option<users::Model>> {
        Ok(Users::find_by_id(login.to_owned()).one(&self.db).await?)
    }

    /// Persist a new user. The role is fixed here, at first sign-up,
    /// and never updated afterwards.
    pub async fn create(&self, login: &str, password_hash: &str, role: Role) -> Result<users::Model> {
        let user = users::ActiveModel {
            login: sea_orm::ActiveValue::Set(login.to_owned()),
            password_hash: sea_orm::ActiveValue::Set(password_hash.to_owned()),
            role: sea_orm::ActiveValue::Set(role.as_str().to_owned()),
        };

        Ok(user.insert(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> UserRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup_test_db().await;

        repo.create("alice", "some-hash", Role::User).await.unwrap();

        let found = repo.find_by_login("alice").await.unwrap().unwrap();
        assert_eq!(found.login, "alice");
        assert_eq!(found.password_hash, "some-hash");
        assert_eq!(found.role.parse(), Ok(Role::User));
    }

    #[tokio::test]
    async fn test_find_unknown_login() {
        let repo = setup_test_db().await;

        let found = repo.find_by_login("nobody").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_role_round_trips_through_storage() {
        let repo = setup_test_db().await;

        repo.create("admin", "h1", Role::Admin).await.unwrap();
        repo.create("nikita", "h2", Role::Exempt).await.unwrap();

        let admin = repo.find_by_login("admin").await.unwrap().unwrap();
        assert_eq!(admin.role.parse(), Ok(Role::Admin));

        let exempt = repo.find_by_login("nikita").await.unwrap().unwrap();
        assert_eq!(exempt.role.parse(), Ok(Role::Exempt));
    }
}
