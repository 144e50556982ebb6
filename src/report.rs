use std::io::{self, Write};

use ising_sim::Observation;

/// Columnar trajectory writer: `step  energy  mag  temp`, with energy and
/// magnetization per site.
///
/// The banner is given at construction and written once as a comment line.
/// The banner and header are flushed before the first step is recorded.
pub struct Reporter<W: Write> {
    out: W,
    interval: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(mut out: W, interval: usize, banner: &str) -> io::Result<Self> {
        for line in banner.lines() {
            writeln!(out, "# {line}")?;
        }
        writeln!(out, "# step  energy  mag  temp")?;
        out.flush()?;
        Ok(Self {
            out,
            interval: interval.max(1),
        })
    }

    /// Write `obs` if its step falls on the reporting interval.
    pub fn record(&mut self, obs: &Observation) -> io::Result<()> {
        if obs.step % self.interval != 0 {
            return Ok(());
        }
        writeln!(
            self.out,
            "{}  {:e}  {:e}  {:e}",
            obs.step,
            obs.energy_per_site(),
            obs.magnetization_per_site(),
            obs.temperature()
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
