pub mod prelude;

pub mod rounds;
pub mod scores;
pub mod users;
