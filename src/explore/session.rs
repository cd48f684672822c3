//! Explorer session: one bounded play-through recording observations.
//!
//! A session owns its own game instance and its own snapshot of the navmesh.
//! It routes to the assigned target, then wanders, writing every confirmed
//! observation into the local mesh. Whatever happens — budget exhausted,
//! shutdown signalled, emulator gone — the accumulated mesh is handed back;
//! partial progress is never discarded.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::core::{Direction, Position};
use crate::error::Result;
use crate::explore::game::GameInterface;
use crate::explore::state::SessionState;
use crate::navmesh::Navmesh;
use crate::routing::route;

/// Per-session tuning.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Maximum movement attempts for the whole session.
    pub step_budget: usize,
    /// Random steps taken after arriving at the target.
    pub wander_steps: usize,
    /// Re-route attempts before giving up on the target and wandering from
    /// wherever the session currently is. Bounds the livelock where the
    /// mesh keeps claiming an edge the world keeps refusing.
    pub reroute_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            step_budget: 500,
            wander_steps: 32,
            reroute_limit: 8,
        }
    }
}

/// What a finished session hands back to the merger.
#[derive(Clone, Debug)]
pub struct SessionReport {
    /// The session's local mesh, including everything observed this run.
    pub mesh: Navmesh,
    /// Where the player ended up. `None` if the game interface failed
    /// before the first observation.
    pub final_position: Option<Position>,
    /// Movement attempts consumed.
    pub steps: usize,
    /// False when the session was cut short by a game-interface failure.
    /// The mesh is still valid and still gets merged.
    pub complete: bool,
}

enum FollowOutcome {
    /// Walked the whole route.
    Arrived,
    /// Plan contradicted by fresh observation (block or warp) or
    /// interrupted; re-route from the current position.
    Diverted,
}

/// Drives one exploration play-through against a [`GameInterface`].
pub struct ExplorerSession<G: GameInterface, R: Rng> {
    game: G,
    mesh: Navmesh,
    target: Position,
    config: SessionConfig,
    rng: R,
    state: SessionState,
    steps: usize,
    wander_remaining: usize,
    /// Last (position, direction) that failed, for the two-strikes rule:
    /// a single blocked attempt records nothing (it may have been a moving
    /// obstacle), the same attempt blocked twice in a row records a
    /// confirmed-block self-edge.
    last_block: Option<(Position, Direction)>,
}

impl<G: GameInterface, R: Rng> ExplorerSession<G, R> {
    /// `snapshot` is the session's private copy of the master mesh; the
    /// session only ever mutates its own copy.
    pub fn new(
        game: G,
        snapshot: Navmesh,
        target: Position,
        config: SessionConfig,
        rng: R,
    ) -> Self {
        Self {
            game,
            mesh: snapshot,
            target,
            config,
            rng,
            state: SessionState::Routing,
            steps: 0,
            wander_remaining: 0,
            last_block: None,
        }
    }

    /// Run the session to completion.
    ///
    /// `shutdown` is the cooperative cancellation flag; it is checked before
    /// every movement attempt, so cancellation still salvages everything
    /// observed so far.
    pub fn run(mut self, shutdown: &AtomicBool) -> SessionReport {
        let mut pos = match self.game.current_position() {
            Ok(p) => p,
            Err(e) => {
                warn!("session lost game before first observation: {e}");
                return self.finish(None, false);
            }
        };
        self.mesh.insert_vertex(pos);
        trace!("session start at {pos}, target {}", self.target);

        let mut reroutes = 0;
        while !self.state.is_terminal() {
            if self.steps >= self.config.step_budget || shutdown.load(Ordering::Relaxed) {
                self.state = SessionState::Done;
                break;
            }
            match self.state {
                SessionState::Routing => match route(&self.mesh, pos, self.target) {
                    Ok(path) if path.is_empty() => self.state = SessionState::Arrived,
                    Ok(path) => match self.follow(&mut pos, &path, shutdown) {
                        Ok(FollowOutcome::Arrived) => self.state = SessionState::Arrived,
                        Ok(FollowOutcome::Diverted) => {
                            reroutes += 1;
                            if reroutes >= self.config.reroute_limit {
                                debug!(
                                    "giving up on {} after {} reroutes, wandering from {pos}",
                                    self.target, reroutes
                                );
                                self.state = SessionState::Arrived;
                            }
                        }
                        Err(e) => {
                            warn!("session aborted mid-route: {e}");
                            return self.finish(Some(pos), false);
                        }
                    },
                    Err(_) => {
                        // Target unreachable with current knowledge; the
                        // walk here still pays off as wandering.
                        debug!("no route from {pos} to {}, wandering instead", self.target);
                        self.state = SessionState::Arrived;
                    }
                },
                SessionState::Arrived => {
                    trace!("arrived at {pos} ({} steps in)", self.steps);
                    self.wander_remaining = self.config.wander_steps;
                    self.state = SessionState::Wandering;
                }
                SessionState::Wandering => {
                    if self.wander_remaining == 0 {
                        self.state = SessionState::Done;
                        continue;
                    }
                    self.wander_remaining -= 1;
                    let dir = Direction::ALL[self.rng.random_range(0..4)];
                    if let Err(e) = self.step(&mut pos, dir) {
                        warn!("session aborted while wandering: {e}");
                        return self.finish(Some(pos), false);
                    }
                }
                SessionState::Done => {}
            }
        }

        self.finish(Some(pos), true)
    }

    /// Walk a computed route one direction at a time, verifying each hop.
    fn follow(
        &mut self,
        pos: &mut Position,
        path: &[Direction],
        shutdown: &AtomicBool,
    ) -> Result<FollowOutcome> {
        for &dir in path {
            if self.steps >= self.config.step_budget || shutdown.load(Ordering::Relaxed) {
                return Ok(FollowOutcome::Diverted);
            }
            let expected = self.mesh.edge(*pos, dir);
            let before = *pos;
            self.step(pos, dir)?;
            if *pos == before {
                // Blocked where the mesh promised passage.
                return Ok(FollowOutcome::Diverted);
            }
            if expected.is_some_and(|e| e != *pos) {
                // Landed somewhere the plan did not predict (warp, ledge).
                trace!("move {dir} from {before} landed at {pos}, replanning");
                return Ok(FollowOutcome::Diverted);
            }
        }
        Ok(FollowOutcome::Arrived)
    }

    /// Attempt one move and record what was observed.
    fn step(&mut self, pos: &mut Position, dir: Direction) -> Result<()> {
        self.steps += 1;
        let outcome = self.game.attempt_move(dir)?;
        if outcome.moved {
            self.last_block = None;
            // The destination is knowledge even if the edge record below
            // loses a conflict.
            self.mesh.insert_vertex(outcome.position);
            self.record(*pos, dir, outcome.position);
            *pos = outcome.position;
        } else if self.last_block.take() == Some((*pos, dir)) {
            // Second consecutive block of the same move: confirmed wall.
            self.record(*pos, dir, *pos);
        } else {
            self.last_block = Some((*pos, dir));
        }
        Ok(())
    }

    fn record(&mut self, src: Position, dir: Direction, dst: Position) {
        match self.mesh.add_edge(src, dir, dst) {
            Ok(true) => trace!("edge {src} {dir} -> {dst}"),
            Ok(false) => {}
            Err(e) => {
                // Keep the first observation; the disagreement is still
                // worth an audit line.
                debug!("observation rejected: {e}");
            }
        }
    }

    fn finish(self, final_position: Option<Position>, complete: bool) -> SessionReport {
        SessionReport {
            mesh: self.mesh,
            final_position,
            steps: self.steps,
            complete,
        }
    }
}
