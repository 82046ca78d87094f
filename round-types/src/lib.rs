pub mod messages;
pub mod round;
pub mod user;

// Re-export all types
pub use messages::*;
pub use round::*;
pub use user::*;
