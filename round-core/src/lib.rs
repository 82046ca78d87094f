pub mod scoring;
pub mod status;

// Re-export main components
pub use scoring::*;
pub use status::*;
