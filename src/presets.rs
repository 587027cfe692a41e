//! The two spray bands framing the coatings landing page.
//!
//! Both bands share one configuration apart from their seeds, and each shows only half of its
//! surface: the top band its upper half, the bottom band its lower half.

use std::ops::Range;

use crate::config::SprayConfig;
use crate::driver::fill::{FrameStats, SprayControl, SprayFill, run_virtual};
use crate::driver::scheduler::VirtualScheduler;
use crate::foundation::color::Color;
use crate::foundation::error::SprayResult;
use crate::mask::spec::MaskSpec;
use crate::render::surface::FrameRGBA;

/// Viewports at or below this width get the reduced flow rate.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

const BAND_HEIGHT: f64 = 240.0;
const DESKTOP_FLOW_RATE: f64 = 80_000.0;
const MOBILE_FLOW_RATE: f64 = 25_000.0;
const DROPLET_SIZE: f64 = 2.5;
const BAND_BACKGROUND: Color = Color {
    r: 35.0 / 255.0,
    g: 98.0 / 255.0,
    b: 146.0 / 255.0,
    a: 1.0,
};

/// Which of the two bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BandSlot {
    /// Above the content; shows the upper half of its surface.
    Top,
    /// Below the content; shows the lower half of its surface.
    Bottom,
}

impl BandSlot {
    /// Seed of this band.
    pub fn seed(self) -> u32 {
        match self {
            Self::Top => 1337,
            Self::Bottom => 2468,
        }
    }

    /// Logical rows of a `height`-tall surface that are on screen.
    pub fn visible_rows(self, height: f64) -> Range<f64> {
        let half = height * 0.5;
        match self {
            Self::Top => 0.0..half,
            Self::Bottom => half..height,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Top => "band-top",
            Self::Bottom => "band-bottom",
        }
    }
}

/// Configuration for one band spanning a viewport `viewport_width` logical pixels wide.
pub fn band_config(slot: BandSlot, viewport_width: f64) -> SprayConfig {
    let mobile = viewport_width <= MOBILE_BREAKPOINT_PX;
    SprayConfig {
        width: viewport_width,
        height: BAND_HEIGHT,
        color: Color::rgba(1.0, 1.0, 1.0, 1.0),
        background: BAND_BACKGROUND,
        flow_rate: if mobile {
            MOBILE_FLOW_RATE
        } else {
            DESKTOP_FLOW_RATE
        },
        nozzle_radius: 8.0,
        droplet_mean: DROPLET_SIZE,
        droplet_sigma: DROPLET_SIZE * 0.4,
        droplet_min: DROPLET_SIZE * 0.4,
        droplet_max: DROPLET_SIZE * 2.0,
        sweep_speed: 2400.0,
        looping: false,
        mask: MaskSpec::Rect,
        seed: slot.seed(),
        label: Some(slot.label().to_string()),
    }
}

/// Top and bottom band, attached and driven together on one frame interval.
pub struct BandPair {
    top: SprayFill,
    bottom: SprayFill,
}

impl BandPair {
    /// Build and attach both bands.
    pub fn new(viewport_width: f64, scale: f64, interval_ms: f64) -> SprayResult<Self> {
        let mut top = SprayFill::new(
            band_config(BandSlot::Top, viewport_width),
            VirtualScheduler::new(interval_ms),
        )?;
        let mut bottom = SprayFill::new(
            band_config(BandSlot::Bottom, viewport_width),
            VirtualScheduler::new(interval_ms),
        )?;
        top.attach(scale)?;
        bottom.attach(scale)?;
        Ok(Self { top, bottom })
    }

    /// The band in `slot`.
    pub fn band(&self, slot: BandSlot) -> &SprayFill {
        match slot {
            BandSlot::Top => &self.top,
            BandSlot::Bottom => &self.bottom,
        }
    }

    /// Mutable access to the band in `slot`.
    pub fn band_mut(&mut self, slot: BandSlot) -> &mut SprayFill {
        match slot {
            BandSlot::Top => &mut self.top,
            BandSlot::Bottom => &mut self.bottom,
        }
    }

    /// Start both bands.
    pub fn start(&mut self) {
        self.top.start();
        self.bottom.start();
    }

    /// Whether either band still has frames scheduled.
    pub fn is_running(&self) -> bool {
        self.top.is_running() || self.bottom.is_running()
    }

    /// Advance both clocks by one frame.
    pub fn step(&mut self) -> (Option<FrameStats>, Option<FrameStats>) {
        (self.top.step_virtual(), self.bottom.step_virtual())
    }

    /// Step until both bands are idle or `max_frames` steps have run. Returns the step count.
    pub fn run_to_idle(&mut self, max_frames: usize) -> usize {
        let top = run_virtual(&mut self.top, max_frames).len();
        let bottom = run_virtual(&mut self.bottom, max_frames).len();
        top.max(bottom)
    }

    /// The on-screen half of a band's paint. `None` while detached.
    pub fn visible(&self, slot: BandSlot) -> Option<FrameRGBA> {
        let band = self.band(slot);
        let frame = band.snapshot()?;
        let scale = f64::from(frame.height) / band.config().height;
        let rows = slot.visible_rows(band.config().height);
        Some(crop_rows(
            &frame,
            (rows.start * scale).floor() as u32,
            (rows.end * scale).floor() as u32,
        ))
    }
}

fn crop_rows(frame: &FrameRGBA, start: u32, end: u32) -> FrameRGBA {
    let end = end.min(frame.height);
    let start = start.min(end);
    let stride = frame.width as usize * 4;
    FrameRGBA {
        width: frame.width,
        height: end - start,
        data: frame.data[start as usize * stride..end as usize * stride].to_vec(),
        premultiplied: frame.premultiplied,
    }
}
