//! # Cartographer: navmesh construction by autonomous play
//!
//! Builds a navigable map of a game world with no prior knowledge of its
//! layout, by repeatedly playing the game and recording which adjacent
//! cells turned out to be reachable from which.
//!
//! ## How it works
//!
//! 1. Seed the master navmesh with the starting cell.
//! 2. Pick a random incomplete vertex (the frontier) as a target.
//! 3. Route there over the edges discovered so far, then wander.
//! 4. Record every observed move, including warps and confirmed walls.
//! 5. Merge each session's partial mesh back into the master.
//! 6. Repeat, in parallel batches, until the time budget runs out.
//!
//! ## Architecture
//!
//! - [`core`]: `Position` and `Direction` value types
//! - [`navmesh`]: the directed graph, with deterministic merging
//! - [`frontier`]: random incomplete-vertex selection
//! - [`routing`]: BFS shortest paths over discovered edges
//! - [`explore`]: the per-session state machine and the [`explore::GameInterface`]
//!   boundary to the emulator
//! - [`scheduler`]: batch generation, threaded dispatch, result folding
//! - [`sim`]: a deterministic mock world for tests and demo runs
//! - [`io`]: the `.navmesh` on-disk format
//!
//! Workers share nothing while running: each session owns a game instance
//! and a private mesh snapshot, and only the single-threaded merger touches
//! the master graph. Merging is commutative and associative for
//! non-conflicting edges, so results can fold in whatever order workers
//! finish; contested edges resolve first-writer-wins and are reported for
//! audit.

pub mod config;
pub mod core;
pub mod error;
pub mod explore;
pub mod frontier;
pub mod io;
pub mod navmesh;
pub mod routing;
pub mod scheduler;
pub mod sim;

pub use self::config::CartographerConfig;
pub use self::core::{Direction, Position};
pub use self::error::{CartographerError, Result};
pub use self::navmesh::{EdgeConflict, Navmesh};
