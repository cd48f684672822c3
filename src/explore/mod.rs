//! One play-through of the game: route to a target, wander, record edges.

mod game;
mod session;
mod state;

pub use game::{GameInterface, GameSpawner, MoveOutcome};
pub use session::{ExplorerSession, SessionConfig, SessionReport};
pub use state::SessionState;
