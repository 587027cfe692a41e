//! Deterministic xorshift32 source plus a Box–Muller Gaussian sampler.

/// Substitute for a zero seed, which would otherwise pin xorshift at zero forever.
pub const ZERO_SEED_FALLBACK: u32 = 123_456_789;

/// Seeded xorshift32 generator.
///
/// Two generators built from the same seed produce bit-identical sequences. The state is never
/// reseeded after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SprayRng {
    state: u32,
}

impl SprayRng {
    /// Seed the generator; `0` is remapped to [`ZERO_SEED_FALLBACK`].
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { ZERO_SEED_FALLBACK } else { seed },
        }
    }

    /// Current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance with the 13/17/5 shift triple and return the new state.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform sample, `state / u32::MAX`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX)
    }

    /// Uniform sample in `[min, min + span)`.
    pub fn range(&mut self, min: f64, span: f64) -> f64 {
        min + self.next_f64() * span
    }

    /// Standard normal sample (mean 0, sigma 1).
    ///
    /// Both uniforms are re-drawn until non-zero so the logarithm stays defined.
    pub fn gaussian(&mut self) -> f64 {
        let mut u = 0.0;
        while u == 0.0 {
            u = self.next_f64();
        }
        let mut v = 0.0;
        while v == 0.0 {
            v = self.next_f64();
        }
        (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * v).cos()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spray/rng.rs"]
mod tests;
