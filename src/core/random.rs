//! Seedable pseudo-random source for spawn sampling.
//!
//! Xorshift32 like the sandbox step loop, extended with the uniform and
//! Gaussian helpers the patterns need. Identical seeds give identical runs.

use std::f32::consts::TAU;

const FALLBACK_SEED: u32 = 12345;

#[derive(Clone, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Xorshift has a fixed point at zero, so a zero seed is remapped
    pub fn new(seed: u32) -> Self {
        Self { state: if seed == 0 { FALLBACK_SEED } else { seed } }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        xorshift32(&mut self.state)
    }

    /// Uniform in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits fit exactly in an f32 mantissa
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in [min, max)
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform angle in [0, 2π)
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    /// True with probability `p`
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Standard normal sample via the Box–Muller transform
    pub fn gaussian(&mut self) -> f32 {
        // u1 in (0, 1] keeps ln() finite
        let u1 = 1.0 - self.next_f32();
        let u2 = self.next_f32();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

/// Xorshift32 random number generator
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}
