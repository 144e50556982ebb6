use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Source of the uniform variates consumed by lattice randomization and the
/// Metropolis engine.
pub trait UniformSource {
    /// Uniform draw from `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// Uniform draw from `0..n`. `n` is always positive.
    fn next_index(&mut self, n: usize) -> usize;
}

impl UniformSource for Xoshiro256StarStar {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }

    #[inline]
    fn next_index(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }

    #[inline]
    fn next_index(&mut self, n: usize) -> usize {
        (**self).next_index(n)
    }
}

/// Deterministic generator seeded from a single `u64`.
pub fn seeded(seed: u64) -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(seed)
}

/// Replays fixed variate streams and records how many of each were consumed.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    uniforms: std::collections::VecDeque<f64>,
    indices: std::collections::VecDeque<usize>,
    pub uniforms_drawn: usize,
    pub indices_drawn: usize,
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(uniforms: &[f64], indices: &[usize]) -> Self {
        Self {
            uniforms: uniforms.iter().copied().collect(),
            indices: indices.iter().copied().collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        self.uniforms_drawn += 1;
        self.uniforms.pop_front().expect("uniform stream exhausted")
    }

    fn next_index(&mut self, n: usize) -> usize {
        self.indices_drawn += 1;
        let i = self.indices.pop_front().expect("index stream exhausted");
        assert!(i < n, "scripted index {i} out of range 0..{n}");
        i
    }
}
