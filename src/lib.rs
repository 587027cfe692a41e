//! Procedural spray-paint fill animation.
//!
//! A seeded droplet emitter follows a nozzle sweeping across a CPU raster surface; accumulated
//! paint is clipped each frame to a mask built from a rectangle, shaped text or a vector path.
//! Frames are driven through a [`FrameScheduler`]; [`VirtualScheduler`] is a manually advanced
//! clock for headless runs.
//!
//! ```no_run
//! use sprayfill::{SprayConfig, SprayControl, SprayFill, VirtualScheduler, run_virtual};
//!
//! let mut fill = SprayFill::new(SprayConfig::default(), VirtualScheduler::new(16.0))?;
//! fill.attach(1.0)?;
//! fill.start();
//! run_virtual(&mut fill, 10_000);
//! let frame = fill.snapshot();
//! # Ok::<(), sprayfill::SprayError>(())
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod driver;
mod foundation;
mod mask;
mod presets;
mod render;
mod spray;

pub use kurbo;

pub use config::SprayConfig;
pub use driver::fill::{FrameStats, MAX_FRAME_DT, SprayControl, SprayFill, run_virtual};
pub use driver::scheduler::{FrameRequest, FrameScheduler, VirtualScheduler};
pub use foundation::color::Color;
pub use foundation::core::{Rgba8Premul, SurfaceDesc};
pub use foundation::error::{SprayError, SprayResult};
pub use mask::compositor::MaskLayer;
pub use mask::spec::{MaskSpec, PathBuilder, TextAlign, TextBaseline, TextMaskOptions};
pub use presets::{BandPair, BandSlot, MOBILE_BREAKPOINT_PX, band_config};
pub use render::surface::FrameRGBA;
pub use spray::emitter::{
    Droplet, DropletKind, DropletSize, EmitStats, Emitter, EmitterParams, MAX_DROPLETS_PER_FRAME,
    MIN_DROPLET_RADIUS, acceptance_probability, droplet_count, normalized_distance,
};
pub use spray::rng::{SprayRng, ZERO_SEED_FALLBACK};
pub use spray::sweep::{Sweep, SweepDirection, SweepOutcome};
