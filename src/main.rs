mod cli;
mod job;
mod logging;
mod report;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::{run_jobs, Job, JobResult, Observation};
use rand::Rng;
use tracing::{error, info};

use cli::Args;
use job::JobFile;
use report::Reporter;

type Trajectory<'a> = Reporter<Box<dyn Write + Send + 'a>>;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.log_level.as_deref());

    match run(&args, io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the sweep described by `args`. `out` receives the `--trace` stream and,
/// without `--output`, one JSON summary line per job.
fn run<W: Write + Send>(args: &Args, out: W) -> Result<()> {
    let file = match args.job.as_deref() {
        Some(path) => JobFile::load(path)?,
        None => JobFile::default(),
    };
    let base_seed = args
        .seed
        .or(file.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    let jobs = file.jobs(base_seed);
    let config = file.sim_config();

    if args.trace && jobs.len() != 1 {
        bail!("--trace needs exactly one job, the job file expands to {}", jobs.len());
    }
    if let Some(dir) = args.output.as_deref() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }
    info!(
        jobs = jobs.len(),
        rows = file.rows,
        cols = file.cols,
        steps = config.n_steps,
        base_seed,
        "starting sweep"
    );

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(jobs.len() as u64)
    };
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )?
        .progress_chars("=> "),
    );
    pb.set_message("jobs");

    let out = Mutex::new(out);
    let last_step = config.n_steps.checked_sub(1);
    let results = run_jobs(
        &jobs,
        &config,
        args.sequential || args.trace,
        |index, job| -> Result<_> {
            let mut trajectory = open_trajectory(args, &file, index, job, &out)?;
            Ok(move |obs: &Observation| -> Result<()> {
                if let Some(rep) = trajectory.as_mut() {
                    rep.record(obs).context("failed to write trajectory")?;
                    if Some(obs.step) == last_step {
                        rep.flush().context("failed to write trajectory")?;
                    }
                }
                Ok(())
            })
        },
        &|_| pb.inc(1),
    )?;
    pb.finish();

    write_summaries(args, &results, &mut *lock(&out))?;
    info!(jobs = results.len(), "sweep finished");
    Ok(())
}

/// Open the trajectory sink of one job: a file under `--output`, the shared
/// `out` under `--trace`, nothing otherwise. The file is closed when the
/// returned reporter is dropped.
fn open_trajectory<'a, W: Write + Send>(
    args: &Args,
    file: &JobFile,
    index: usize,
    job: &Job,
    out: &'a Mutex<W>,
) -> Result<Option<Trajectory<'a>>> {
    let sink: Box<dyn Write + Send + 'a> = if args.trace {
        Box::new(BufWriter::new(Shared(out)))
    } else if let Some(dir) = args.output.as_deref() {
        let path = dir.join(format!("job-{index:03}.dat"));
        let f = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Box::new(BufWriter::new(f))
    } else {
        return Ok(None);
    };
    let rep = Reporter::new(sink, file.report_interval, &banner(job, file))
        .context("failed to write trajectory header")?;
    Ok(Some(rep))
}

/// Writer that forwards to a sink shared between jobs.
struct Shared<'a, W>(&'a Mutex<W>);

impl<W: Write> Write for Shared<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(self.0).flush()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn banner(job: &Job, file: &JobFile) -> String {
    format!(
        "ising {}\nrows={} cols={} J={} H={} beta={} seed={} steps={}",
        env!("CARGO_PKG_VERSION"),
        job.rows,
        job.cols,
        job.params.j,
        job.params.h,
        job.params.beta,
        job.seed,
        file.steps,
    )
}

fn write_summaries(args: &Args, results: &[JobResult], out: &mut impl Write) -> Result<()> {
    if let Some(dir) = args.output.as_deref() {
        let path = dir.join("summary.json");
        write_summary_file(&path, results)
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else if args.trace {
        for r in results {
            info!(summary = %serde_json::to_string(r)?, "job summary");
        }
    } else {
        for r in results {
            serde_json::to_writer(&mut *out, r)?;
            writeln!(out)?;
        }
        out.flush()?;
    }
    Ok(())
}

fn write_summary_file(path: &Path, results: &[JobResult]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, results)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
