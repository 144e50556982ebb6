use std::time::Instant;

use ising_sim::mcmc::seeded;
use ising_sim::{run_jobs, Job, Lattice, Metropolis, ModelParams, Observation, SimConfig, SimError};

const L: usize = 128;
const N_TEMPS: usize = 16;
const N_STEPS: usize = 50 * L * L;

fn main() -> Result<(), SimError> {
    let params = ModelParams::new(1.0, 0.0, 1.0 / 2.269);

    let mut rng = seeded(42);
    let mut lattice = Lattice::new(L, L, params, &mut rng)?;
    let mut engine = Metropolis::new(rng);

    println!("Lattice: {L}x{L}  |  Steps: {N_STEPS}  |  beta: {:.4}", params.beta);
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    let accepted = engine.run(&mut lattice, N_STEPS);
    let elapsed = t0.elapsed().as_secs_f64();
    println!(
        "Single lattice: {:.3} s  |  {:.1} ns/step  |  acceptance {:.3}",
        elapsed,
        elapsed / N_STEPS as f64 * 1e9,
        accepted as f64 / N_STEPS as f64
    );

    let jobs: Vec<Job> = (0..N_TEMPS)
        .map(|i| {
            let temp = 0.5 * (10.0f64).powf(i as f64 / (N_TEMPS - 1) as f64);
            Job::new(L, L, ModelParams::new(1.0, 0.0, 1.0 / temp), 42 + i as u64)
        })
        .collect();
    let config = SimConfig::new(N_STEPS);

    let t0 = Instant::now();
    let results = run_jobs(
        &jobs,
        &config,
        false,
        |_, _| Ok(|_: &Observation| Ok::<(), SimError>(())),
        &|_| {},
    )?;
    let elapsed = t0.elapsed().as_secs_f64();
    println!(
        "Sweep of {} lattices: {:.3} s  |  {:.1} ns/step",
        results.len(),
        elapsed,
        elapsed / (N_STEPS * N_TEMPS) as f64 * 1e9
    );
    for r in &results {
        println!(
            "  T = {:.3}  <e> = {:+.4}  <|m|> = {:.4}",
            r.job.params.temperature(),
            r.summary.energy,
            r.summary.abs_mag
        );
    }
    Ok(())
}
