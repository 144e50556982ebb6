pub mod metropolis;
pub mod rng;

pub use metropolis::{Metropolis, Observation};
pub use rng::{seeded, UniformSource};

#[cfg(test)]
pub(crate) use rng::ScriptedSource;
