//! Game interface trait for emulator abstraction.

use crate::core::{Direction, Position};
use crate::error::Result;

/// Result of one attempted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the player's position changed.
    pub moved: bool,
    /// Position after the attempt. Equal to the pre-move position when
    /// blocked; may be an entirely unexpected cell (warp tile, ledge hop).
    pub position: Position,
}

/// Trait abstracting the running game.
///
/// Implement this to connect the explorer to a real emulator or a simulated
/// world. The core never interprets game memory; this typed surface is all
/// it consumes.
///
/// # Example
///
/// ```ignore
/// struct Emulator { /* emulator process handle */ }
///
/// impl GameInterface for Emulator {
///     fn current_position(&mut self) -> Result<Position> {
///         // Read map id and coordinates from the save-state RAM map.
///         Ok(self.read_player_position()?)
///     }
///
///     fn attempt_move(&mut self, dir: Direction) -> Result<MoveOutcome> {
///         self.press(dir)?;
///         let after = self.read_player_position()?;
///         Ok(MoveOutcome { moved: after != self.last, position: after })
///     }
/// }
/// ```
pub trait GameInterface {
    /// Observe the player's current cell.
    ///
    /// Errors here are connection-level (`GameTimeout`/`GameDisconnect`);
    /// the session salvages its partial mesh and stops.
    fn current_position(&mut self) -> Result<Position>;

    /// Press a direction and observe what happened.
    ///
    /// A blocked move returns `moved: false` with the unchanged position.
    /// A successful move returns wherever the player actually ended up,
    /// which need not be the naively adjacent cell.
    fn attempt_move(&mut self, dir: Direction) -> Result<MoveOutcome>;
}

/// Factory creating one game instance per job.
///
/// Game instances are never shared: each worker gets its own from the
/// spawner, keyed by the job's rom/save-state identifier. Whether that
/// spawns a subprocess, connects to a remote emulator, or builds a
/// simulation is the implementor's business.
pub trait GameSpawner: Send + Sync {
    type Game: GameInterface + Send;

    fn spawn(&self, rom: &str) -> Result<Self::Game>;
}
