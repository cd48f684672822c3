//! Batch generation and the master-mesh merge loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::core::Position;
use crate::error::{CartographerError, Result};
use crate::frontier::random_incomplete;
use crate::navmesh::Navmesh;
use crate::scheduler::dispatch::Dispatcher;
use crate::scheduler::job::{ExplorationResult, Job};

/// How long to keep draining in-flight workers after the deadline fires.
const DRAIN_GRACE: Duration = Duration::from_secs(10);

/// Generate a batch of independent jobs.
///
/// Each worker gets a rom (cycled through `roms`), a target picked by the
/// frontier selector against the current mesh and visited list, and the
/// per-worker step budget. Returns an empty batch only when there is
/// nothing to target at all.
pub fn gen_batch<R: Rng + ?Sized>(
    roms: &[String],
    worker_count: usize,
    steps_per_worker: usize,
    mesh: &Navmesh,
    visited: &[Position],
    next_id: &mut u64,
    rng: &mut R,
) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(worker_count);
    for i in 0..worker_count {
        let Some(target) = random_incomplete(mesh, visited, rng) else {
            break;
        };
        let id = *next_id;
        *next_id += 1;
        jobs.push(Job {
            id,
            rom: roms[i % roms.len()].clone(),
            target,
            step_budget: steps_per_worker,
        });
    }
    jobs
}

/// Aggregate outcome of a run.
#[derive(Debug)]
pub struct RunSummary {
    /// The master navmesh, best-effort even if individual workers failed.
    pub mesh: Navmesh,
    pub batches: usize,
    pub results: usize,
    /// Sessions that ended on a game-interface failure. Their partial
    /// meshes are already folded in.
    pub incomplete_results: usize,
    /// Contested edges discarded by the first-writer-wins merge policy.
    pub conflicts: usize,
    pub elapsed: Duration,
}

/// Owns the master navmesh and drives batches until the time budget runs
/// out.
///
/// The master mesh is only ever touched here, between batches, on one
/// thread; workers each operate on their own snapshot. Results fold in
/// arrival order, which is safe because merges of non-conflicting edges
/// commute, and contested edges resolve first-writer-wins.
#[derive(Debug)]
pub struct Scheduler<D: Dispatcher, R: Rng> {
    dispatcher: D,
    rng: R,
    master: Navmesh,
    visited: Vec<Position>,
    roms: Vec<String>,
    worker_count: usize,
    steps_per_worker: usize,
    next_job_id: u64,
}

impl<D: Dispatcher, R: Rng> Scheduler<D, R> {
    pub fn new(
        dispatcher: D,
        rng: R,
        origin: Position,
        roms: Vec<String>,
        worker_count: usize,
        steps_per_worker: usize,
    ) -> Result<Self> {
        if roms.is_empty() {
            return Err(CartographerError::Config("no roms configured".into()));
        }
        if worker_count == 0 {
            return Err(CartographerError::Config("worker count must be > 0".into()));
        }
        if steps_per_worker == 0 {
            return Err(CartographerError::Config(
                "steps per worker must be > 0".into(),
            ));
        }
        Ok(Self {
            dispatcher,
            rng,
            master: Navmesh::with_origin(origin),
            visited: vec![origin],
            roms,
            worker_count,
            steps_per_worker,
            next_job_id: 0,
        })
    }

    /// Run batches until `time_budget` elapses, then return the master mesh.
    pub fn run(mut self, time_budget: Duration) -> RunSummary {
        let started = Instant::now();
        let deadline = started + time_budget;
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut batches = 0;
        let mut results = 0;
        let mut incomplete = 0;
        let mut conflicts = 0;

        while Instant::now() < deadline && !shutdown.load(Ordering::Relaxed) {
            let jobs = gen_batch(
                &self.roms,
                self.worker_count,
                self.steps_per_worker,
                &self.master,
                &self.visited,
                &mut self.next_job_id,
                &mut self.rng,
            );
            if jobs.is_empty() {
                info!("nothing left to target, stopping early");
                break;
            }
            batches += 1;
            debug!("batch {batches}: {} jobs", jobs.len());

            let rx = self
                .dispatcher
                .run_batch(jobs, &self.master, Arc::clone(&shutdown));
            let (batch_results, batch_incomplete, batch_conflicts) =
                self.fold_batch(rx, deadline, &shutdown);
            results += batch_results;
            incomplete += batch_incomplete;
            conflicts += batch_conflicts;

            debug!(
                "batch {batches} merged: {} vertices, {} edges, {} frontier",
                self.master.vertex_count(),
                self.master.edge_count(),
                self.master.incomplete_vertices().len()
            );
        }

        RunSummary {
            mesh: self.master,
            batches,
            results,
            incomplete_results: incomplete,
            conflicts,
            elapsed: started.elapsed(),
        }
    }

    /// Fold one batch's results as they arrive, honoring the deadline.
    ///
    /// Past the deadline the shutdown flag goes up and we keep draining for
    /// a grace period — cancelled sessions still send their partial meshes
    /// and those are never thrown away.
    fn fold_batch(
        &mut self,
        rx: Receiver<ExplorationResult>,
        deadline: Instant,
        shutdown: &AtomicBool,
    ) -> (usize, usize, usize) {
        let mut results = 0;
        let mut incomplete = 0;
        let mut conflicts = 0;
        loop {
            let now = Instant::now();
            let timeout = if now < deadline {
                deadline - now
            } else {
                shutdown.store(true, Ordering::Relaxed);
                DRAIN_GRACE
            };
            match rx.recv_timeout(timeout) {
                Ok(result) => {
                    results += 1;
                    if !result.complete {
                        incomplete += 1;
                    }
                    conflicts += self.fold(result);
                }
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    if shutdown.load(Ordering::Relaxed) {
                        warn!("workers still busy after drain grace, abandoning batch");
                        break;
                    }
                    // Deadline just passed; loop once more to raise the
                    // flag and drain.
                }
            }
        }
        (results, incomplete, conflicts)
    }

    /// Merge one result into the master mesh. Returns the conflict count.
    fn fold(&mut self, result: ExplorationResult) -> usize {
        let merge_conflicts = self.master.merge(&result.mesh);
        for conflict in &merge_conflicts {
            debug!("job {} merge conflict: {conflict}", result.job_id);
        }
        if let Some(final_position) = result.final_position {
            self.visited.push(final_position);
        }
        debug!(
            "job {} contributed {} vertices in {} steps (complete: {})",
            result.job_id,
            result.mesh.vertex_count(),
            result.steps,
            result.complete
        );
        merge_conflicts.len()
    }
}
