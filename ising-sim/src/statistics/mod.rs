pub mod results;
mod stats;

pub use results::{RunSummary, SummaryAccum};
pub use stats::Statistics;
