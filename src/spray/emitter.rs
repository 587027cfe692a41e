//! Stochastic droplet emission around the nozzle.
//!
//! The shaping constants below were tuned by eye for a graffiti look; they carry no physical
//! meaning and are kept verbatim so runs stay visually stable across versions.

use crate::foundation::core::Point;
use crate::foundation::math::clamp_f64;
use crate::spray::rng::SprayRng;

/// Upper bound on droplets attempted in a single frame.
pub const MAX_DROPLETS_PER_FRAME: usize = 5000;
/// Smallest radius ever drawn, in logical pixels.
pub const MIN_DROPLET_RADIUS: f64 = 0.25;

const SPREAD_MULTIPLIER: f64 = 2.0;
const SCATTERED_PROBABILITY: f64 = 0.45;

const FILL_SPREAD_EXPONENT: f64 = 3.0;
const FILL_SPREAD_REACH: f64 = 0.75;
// Full jitter span as a fraction of height (centred, so +-10%).
const FILL_JITTER_SPAN: f64 = 0.2;

const ACCEPT_FLOOR: f64 = 0.2;
const ACCEPT_FALLOFF_EXPONENT: f64 = 2.2;

const SCATTERED_SIZE_MIN: f64 = 0.08;
const SCATTERED_SIZE_SPAN: f64 = 0.25;
const FILL_SIZE_BASE: f64 = 0.25;
const FILL_SIZE_GAIN: f64 = 0.95;
const FILL_SIZE_EXPONENT: f64 = 1.6;
const SIZE_JITTER_MIN: f64 = 0.9;
const SIZE_JITTER_SPAN: f64 = 0.2;

/// One filled circular mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Droplet {
    /// Centre in logical coordinates.
    pub center: Point,
    /// Radius in logical pixels.
    pub radius: f64,
}

/// How a droplet was placed vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropletKind {
    /// Sparse dot placed almost uniformly over the full height, kept small.
    Scattered,
    /// Centre-biased dot that builds the solid band.
    Fill,
}

/// Droplet size distribution in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropletSize {
    /// Mean base radius.
    pub mean: f64,
    /// Standard deviation of the base radius.
    pub sigma: f64,
    /// Lower clamp for both base and final radius.
    pub min: f64,
    /// Upper clamp for both base and final radius.
    pub max: f64,
}

/// Emission parameters fixed for an instance's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterParams {
    /// Target droplets per second.
    pub flow_rate: f64,
    /// Horizontal spread sigma in logical pixels.
    pub nozzle_radius: f64,
    /// Size distribution.
    pub size: DropletSize,
}

/// Per-batch counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitStats {
    /// Droplets sampled this batch (after the per-frame cap).
    pub attempted: usize,
    /// Droplets that passed the density test and were queued for drawing.
    pub drawn: usize,
}

/// `floor(flow_rate * dt)`, capped at [`MAX_DROPLETS_PER_FRAME`].
pub fn droplet_count(flow_rate: f64, dt: f64) -> usize {
    let target = flow_rate * dt;
    if !target.is_finite() || target <= 0.0 {
        return 0;
    }
    let n = target.floor();
    if n >= MAX_DROPLETS_PER_FRAME as f64 {
        MAX_DROPLETS_PER_FRAME
    } else {
        n as usize
    }
}

/// Owns the instance's random stream and turns elapsed time into droplets.
#[derive(Clone, Debug)]
pub struct Emitter {
    params: EmitterParams,
    rng: SprayRng,
}

impl Emitter {
    /// Create an emitter with its own generator seeded from `seed`.
    pub fn new(params: EmitterParams, seed: u32) -> Self {
        Self {
            params,
            rng: SprayRng::new(seed),
        }
    }

    /// Emission parameters.
    pub fn params(&self) -> &EmitterParams {
        &self.params
    }

    /// Sample one batch for `dt` seconds around `nozzle_x` on a surface `height` tall.
    ///
    /// `out` is cleared and receives the accepted droplets in draw order.
    pub fn emit(&mut self, nozzle_x: f64, dt: f64, height: f64, out: &mut Vec<Droplet>) -> EmitStats {
        out.clear();
        let attempted = droplet_count(self.params.flow_rate, dt);
        let half = height * 0.5;

        for _ in 0..attempted {
            let x = nozzle_x + self.rng.gaussian() * self.params.nozzle_radius * SPREAD_MULTIPLIER;

            let kind = if self.rng.next_f64() < SCATTERED_PROBABILITY {
                DropletKind::Scattered
            } else {
                DropletKind::Fill
            };

            let y = match kind {
                DropletKind::Scattered => self.rng.next_f64() * height,
                DropletKind::Fill => {
                    let spread = self.rng.next_f64().powf(FILL_SPREAD_EXPONENT);
                    let sign = if self.rng.next_f64() < 0.5 { -1.0 } else { 1.0 };
                    let jitter = (self.rng.next_f64() - 0.5) * height * FILL_JITTER_SPAN;
                    let y = half + sign * half * spread * FILL_SPREAD_REACH + jitter;
                    clamp_f64(y, 0.0, height)
                }
            };

            let nd = normalized_distance(y, height);
            if self.rng.next_f64() >= acceptance_probability(nd) {
                continue;
            }

            let radius = self.sample_radius(kind, nd);
            out.push(Droplet {
                center: Point::new(x, y),
                radius,
            });
        }

        EmitStats {
            attempted,
            drawn: out.len(),
        }
    }

    /// Draw a final radius for a droplet of `kind` at normalized distance `nd`.
    ///
    /// The result is always within `[MIN_DROPLET_RADIUS, size.max]` (the floor wins if a
    /// configuration ever puts `max` below it).
    pub fn sample_radius(&mut self, kind: DropletKind, nd: f64) -> f64 {
        let size = self.params.size;
        let multiplier = match kind {
            DropletKind::Scattered => self.rng.range(SCATTERED_SIZE_MIN, SCATTERED_SIZE_SPAN),
            DropletKind::Fill => fill_size_multiplier(nd),
        };
        let base = clamp_f64(size.mean + self.rng.gaussian() * size.sigma, size.min, size.max);
        let radius = base * multiplier * self.rng.range(SIZE_JITTER_MIN, SIZE_JITTER_SPAN);
        radius.min(size.max).max(MIN_DROPLET_RADIUS)
    }
}

/// Vertical distance from centre scaled by half the height: 0 at centre, 1 at either edge.
pub fn normalized_distance(y: f64, height: f64) -> f64 {
    let half = height * 0.5;
    if half <= 0.0 {
        return 0.0;
    }
    clamp_f64((y - half).abs() / half, 0.0, 1.0)
}

/// Chance a sampled droplet is kept: `0.2 + 0.8 * (1 - nd)^2.2`.
pub fn acceptance_probability(nd: f64) -> f64 {
    let falloff = (1.0 - clamp_f64(nd, 0.0, 1.0)).powf(ACCEPT_FALLOFF_EXPONENT);
    ACCEPT_FLOOR + falloff * (1.0 - ACCEPT_FLOOR)
}

fn fill_size_multiplier(nd: f64) -> f64 {
    let reduction = (1.0 - clamp_f64(nd, 0.0, 1.0)).powf(FILL_SIZE_EXPONENT);
    FILL_SIZE_BASE + reduction * FILL_SIZE_GAIN
}

#[cfg(test)]
#[path = "../../tests/unit/spray/emitter.rs"]
mod tests;
