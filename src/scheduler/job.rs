//! Job and result types exchanged with workers.

use crate::core::Position;
use crate::explore::SessionReport;
use crate::navmesh::Navmesh;

/// One scheduled, independent exploration task.
///
/// Created by the batch scheduler, consumed exactly once by exactly one
/// worker, discarded once its result is merged.
#[derive(Clone, Debug)]
pub struct Job {
    /// Monotonic id within the run, used for logging and per-job rng seeds.
    pub id: u64,
    /// Rom/save-state identifier the worker should play.
    pub rom: String,
    /// Position the session should route toward before wandering.
    pub target: Position,
    /// Movement-attempt budget for the session.
    pub step_budget: usize,
}

/// What a worker hands back for one [`Job`].
#[derive(Clone, Debug)]
pub struct ExplorationResult {
    pub job_id: u64,
    /// Partial navmesh built by the session. May be empty if the game could
    /// not even be spawned; the merger treats that as a normal, if small,
    /// contribution.
    pub mesh: Navmesh,
    /// Final position reached, fed back into the visited list.
    pub final_position: Option<Position>,
    /// Movement attempts consumed.
    pub steps: usize,
    /// False when the session was cut short by a game-interface failure.
    pub complete: bool,
}

impl ExplorationResult {
    pub fn from_report(job_id: u64, report: SessionReport) -> Self {
        Self {
            job_id,
            mesh: report.mesh,
            final_position: report.final_position,
            steps: report.steps,
            complete: report.complete,
        }
    }

    /// Result for a job whose game instance never came up.
    pub fn empty(job_id: u64) -> Self {
        Self {
            job_id,
            mesh: Navmesh::new(),
            final_position: None,
            steps: 0,
            complete: false,
        }
    }
}
