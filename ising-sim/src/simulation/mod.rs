pub mod job;

pub use job::{Job, JobResult};

use rayon::prelude::*;
use tracing::debug;
use validator::Validate;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::mcmc::{seeded, Metropolis, Observation};
use crate::spins::Lattice;
use crate::statistics::SummaryAccum;

/// Run one job from a freshly randomized lattice.
///
/// The lattice and the engine draw from one xoshiro stream seeded with
/// `job.seed`, so a job replays bit-for-bit. `on_step` sees every step,
/// warmup included; observables are sampled into the summary every
/// `measure_interval` steps once warmup is over.
pub fn run_job<E>(
    job: &Job,
    config: &SimConfig,
    mut on_step: impl FnMut(&Observation) -> Result<(), E>,
) -> Result<JobResult, E>
where
    E: From<SimError>,
{
    config.validate().map_err(SimError::from)?;

    let mut rng = seeded(job.seed);
    let mut lattice =
        Lattice::new(job.rows, job.cols, job.params, &mut rng).map_err(SimError::from)?;
    let mut engine = Metropolis::new(rng);
    let mut accum = SummaryAccum::new(lattice.size(), job.params.beta);

    debug!(
        rows = job.rows,
        cols = job.cols,
        j = job.params.j,
        h = job.params.h,
        beta = job.params.beta,
        seed = job.seed,
        "job started"
    );

    let accepted = engine.run_observed(&mut lattice, config.n_steps, |obs| {
        if obs.step >= config.warmup_steps
            && (obs.step - config.warmup_steps) % config.measure_interval == 0
        {
            accum.push(obs);
        }
        on_step(obs)
    })?;

    let summary = accum.finish(accepted, config.n_steps);
    debug!(
        seed = job.seed,
        energy = lattice.energy(),
        magnetization = lattice.magnetization(),
        acceptance = summary.acceptance_rate,
        "job finished"
    );

    Ok(JobResult {
        job: job.clone(),
        steps: config.n_steps,
        accepted,
        final_energy: lattice.energy(),
        final_magnetization: lattice.magnetization(),
        summary,
    })
}

/// Run independent jobs, in parallel unless `sequential` is set.
///
/// `make_observer(index, job)` builds the per-step observer of each job right
/// before that job starts, and the observer is dropped when the job ends, so
/// per-job resources live only as long as their job. `on_done` is called once
/// per finished job, including jobs with zero steps.
///
/// Every job owns its lattice and generator, so results are identical in
/// both modes and come back in input order.
pub fn run_jobs<F, O, E>(
    jobs: &[Job],
    config: &SimConfig,
    sequential: bool,
    make_observer: F,
    on_done: &(dyn Fn(&JobResult) + Sync),
) -> Result<Vec<JobResult>, E>
where
    F: Fn(usize, &Job) -> Result<O, E> + Sync,
    O: FnMut(&Observation) -> Result<(), E>,
    E: From<SimError> + Send,
{
    let work = |(index, job): (usize, &Job)| -> Result<JobResult, E> {
        let result = run_job(job, config, make_observer(index, job)?)?;
        on_done(&result);
        Ok(result)
    };

    if sequential {
        jobs.iter().enumerate().map(work).collect()
    } else {
        jobs.par_iter().enumerate().map(work).collect()
    }
}
