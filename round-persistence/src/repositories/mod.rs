pub mod round_repository;
pub mod score_repository;
pub mod user_repository;

pub use round_repository::RoundRepository;
pub use score_repository::ScoreRepository;
pub use user_repository::UserRepository;
