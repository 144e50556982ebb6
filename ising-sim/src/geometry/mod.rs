pub mod offsets;
pub mod wrap;

pub use offsets::{orthogonal, ORTHOGONAL};
pub use wrap::wrap;
