pub mod errors;
pub mod evaluation;
pub mod game_events;
pub mod game_match;
pub mod player;
pub mod registry;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod timers;

// Re-export main components
pub use errors::*;
pub use evaluation::*;
pub use game_events::*;
pub use game_match::*;
pub use player::*;
pub use registry::*;
pub use round::*;
pub use rules::*;
pub use scoring::*;
pub use session::*;
pub use timers::*;
