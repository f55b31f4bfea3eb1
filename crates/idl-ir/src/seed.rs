//! Caller-owned randomness for value selection.
//!
//! Nothing in the IR draws from a global generator. Consumers that pick
//! random enum values pass a [`SeedSource`] explicitly, so two units built on
//! different threads never share state and a fixed seed reproduces a run.

/// A stream of pseudo-random `u64`s.
pub trait SeedSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform-ish index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

/// SplitMix64 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub const fn new(seed: u64) -> Self {
        // SplitMix64 needs a non-zero state
        let state = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state }
    }

    pub const fn state(&self) -> u64 {
        self.state
    }
}

impl SeedSource for SplitMix64 {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        mix(self.state)
    }
}

#[inline]
const fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
