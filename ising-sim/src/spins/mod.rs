pub mod energy;
pub mod lattice;
pub mod params;

pub use lattice::Lattice;
pub use params::ModelParams;
