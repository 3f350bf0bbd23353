pub mod game;
pub mod messages;
pub mod player;
pub mod errors;

// Re-export all types
pub use game::*;
pub use messages::*;
pub use player::*;
pub use errors::*;
