//! Worker dispatch: submit jobs, receive results.
//!
//! The scheduler is agnostic to the execution substrate; anything that can
//! take a batch of jobs and deliver [`ExplorationResult`]s over a channel
//! satisfies [`Dispatcher`]. The provided [`ThreadDispatcher`] runs one
//! named thread per job with its own game instance and mesh snapshot, the
//! way the rest of this crate assumes workers share nothing.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;

use crossbeam_channel::{Receiver, bounded};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::explore::{ExplorerSession, GameSpawner, SessionConfig};
use crate::navmesh::Navmesh;
use crate::scheduler::job::{ExplorationResult, Job};

/// Execution substrate for a batch of jobs.
pub trait Dispatcher {
    /// Start every job in `jobs` and return the channel results will arrive
    /// on, in whatever order workers finish. The channel disconnects once
    /// all workers are done. `shutdown` is the cooperative cancellation
    /// flag shared with every session.
    fn run_batch(
        &self,
        jobs: Vec<Job>,
        snapshot: &Navmesh,
        shutdown: Arc<AtomicBool>,
    ) -> Receiver<ExplorationResult>;
}

/// Local-thread dispatcher: one worker thread and one game instance per job.
pub struct ThreadDispatcher<S: GameSpawner> {
    spawner: Arc<S>,
    session: SessionConfig,
    /// Base seed for per-job rngs; 0 derives seeds from entropy.
    seed: u64,
}

impl<S: GameSpawner + 'static> ThreadDispatcher<S> {
    pub fn new(spawner: S, session: SessionConfig, seed: u64) -> Self {
        Self {
            spawner: Arc::new(spawner),
            session,
            seed,
        }
    }

    fn job_rng(&self, job_id: u64) -> StdRng {
        if self.seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(self.seed.wrapping_add(job_id))
        }
    }
}

impl<S: GameSpawner + 'static> Dispatcher for ThreadDispatcher<S> {
    fn run_batch(
        &self,
        jobs: Vec<Job>,
        snapshot: &Navmesh,
        shutdown: Arc<AtomicBool>,
    ) -> Receiver<ExplorationResult> {
        let (tx, rx) = bounded(jobs.len().max(1));

        for job in jobs {
            let tx = tx.clone();
            let spawner = Arc::clone(&self.spawner);
            let shutdown = Arc::clone(&shutdown);
            let mesh = snapshot.clone();
            let rng = self.job_rng(job.id);
            let config = SessionConfig {
                step_budget: job.step_budget,
                ..self.session
            };

            let spawn = thread::Builder::new()
                .name(format!("explorer-{}", job.id))
                .spawn(move || {
                    debug!(
                        "job {} on rom {} targeting {}",
                        job.id, job.rom, job.target
                    );
                    let result = match spawner.spawn(&job.rom) {
                        Ok(game) => {
                            let session =
                                ExplorerSession::new(game, mesh, job.target, config, rng);
                            let report = session.run(&shutdown);
                            ExplorationResult::from_report(job.id, report)
                        }
                        Err(e) => {
                            warn!("job {} could not spawn rom {}: {e}", job.id, job.rom);
                            ExplorationResult::empty(job.id)
                        }
                    };
                    // A closed channel just means the run was abandoned.
                    let _ = tx.send(result);
                });
            if let Err(e) = spawn {
                warn!("failed to spawn worker thread: {e}");
            }
        }

        rx
    }
}
