//! Injectable randomness for tie-breaks
//!
//! Sources are created per call by the caller and lent to the engine.
//! Production code uses a fresh thread-local generator per request; tests
//! use a seeded generator or a fixed index sequence.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Supplies uniform indices for tie-breaking
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is at least 1.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Adapts any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<ThreadRng> {
    /// Thread-local generator, uniform and unseeded
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl RngSource<StdRng> {
    /// Deterministic generator for reproducible selections
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Replays a fixed sequence of indices, each reduced modulo `len`
///
/// Cycles when exhausted. An empty sequence always picks 0.
#[derive(Debug, Clone, Default)]
pub struct FixedSource {
    indices: Vec<usize>,
    position: usize,
}

impl FixedSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            position: 0,
        }
    }

    /// Always picks the first tied candidate
    pub fn first() -> Self {
        Self::default()
    }
}

impl RandomSource for FixedSource {
    fn pick_index(&mut self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let index = self.indices[self.position % self.indices.len()];
        self.position += 1;
        index % len
    }
}
