pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::SimConfig;
pub use error::{LatticeError, SimError};
pub use mcmc::{Metropolis, Observation, UniformSource};
pub use simulation::{run_job, run_jobs, Job, JobResult};
pub use spins::{Lattice, ModelParams};
pub use statistics::RunSummary;
