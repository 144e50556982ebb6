use std::path::PathBuf;

use clap::Parser;

/// Metropolis Monte Carlo simulation of the 2D Ising model.
#[derive(Parser, Debug)]
#[command(name = "ising", version, about, long_about = None)]
pub struct Args {
    /// JSON job file. Without one, a single 20x20 job at J=1, H=0, beta=5 runs.
    #[arg(value_name = "JOB")]
    pub job: Option<PathBuf>,

    /// Directory for per-job trajectories (`job-NNN.dat`) and `summary.json`.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Stream the trajectory of a single job to stdout.
    #[arg(long, default_value_t = false)]
    pub trace: bool,

    /// Base seed; overrides the job file. Job `i` uses `seed + i`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run jobs one after another instead of on the thread pool.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Hide the progress bar.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Log level (0-4 or trace, debug, info, warn, error). Overrides LOG_LEVEL.
    #[arg(long)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "ising", "job.json", "-o", "out", "--seed", "9", "--sequential", "-q",
        ])
        .unwrap();
        assert_eq!(args.job, Some(PathBuf::from("job.json")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.seed, Some(9));
        assert!(args.sequential && args.quiet && !args.trace);
        assert_eq!(args.log_level, None);
    }
}
