pub use super::rounds::Entity as Rounds;
pub use super::scores::Entity as Scores;
pub use super::users::Entity as Users;
