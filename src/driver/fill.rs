use crate::config::SprayConfig;
use crate::driver::scheduler::{FrameRequest, FrameScheduler, VirtualScheduler};
use crate::foundation::core::{Point, Rgba8Premul, SurfaceDesc};
use crate::foundation::error::SprayResult;
use crate::mask::compositor::{MaskCompositor, MaskLayer};
use crate::render::surface::{FrameRGBA, RasterSurface};
use crate::spray::emitter::{Droplet, Emitter};
use crate::spray::sweep::{Sweep, SweepDirection, SweepOutcome};

/// Largest delta-time applied in one frame, in seconds.
pub const MAX_FRAME_DT: f64 = 0.05;

/// The imperative handle exposed to the embedding page.
///
/// All operations are infallible. Without an attached surface they only touch sweep state.
pub trait SprayControl {
    /// Begin or resume the sweep from the current position. No-op while running or detached.
    fn start(&mut self);
    /// Stop advancing and cancel the pending frame. Paint and nozzle position are kept.
    fn pause(&mut self);
    /// Stop, clear paint back to the background and rewind the nozzle to the left boundary.
    fn reset(&mut self);
    /// Force the sweep direction without moving the nozzle.
    fn set_sweep_direction(&mut self, direction: SweepDirection);
}

/// What one frame callback did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// Applied delta-time in seconds.
    pub dt: f64,
    /// Nozzle x after the sweep step.
    pub nozzle_x: f64,
    /// Direction after the sweep step.
    pub direction: SweepDirection,
    /// Boundary transition of this step.
    pub outcome: SweepOutcome,
    /// Droplets sampled.
    pub emitted: usize,
    /// Droplets painted.
    pub drawn: usize,
    /// Whether another frame was scheduled.
    pub running: bool,
}

/// One spray-fill animation instance.
///
/// Owns its random stream, nozzle, mask cache and paint surface. Frames are driven by the
/// scheduler `S`; the host hands every fired request back through [`SprayFill::on_frame`].
pub struct SprayFill<S: FrameScheduler = VirtualScheduler> {
    config: SprayConfig,
    paint_rgba: [u8; 4],
    background: Rgba8Premul,
    emitter: Emitter,
    sweep: Sweep,
    masks: MaskCompositor,
    surface: Option<RasterSurface>,
    scheduler: S,
    pending: Option<FrameRequest>,
    running: bool,
    prev_timestamp_ms: Option<f64>,
    droplets: Vec<Droplet>,
    span: tracing::Span,
}

impl<S: FrameScheduler> SprayFill<S> {
    /// Validate `config` and build an idle, detached instance.
    #[tracing::instrument(skip_all, fields(seed = config.seed))]
    pub fn new(config: SprayConfig, scheduler: S) -> SprayResult<Self> {
        config.validate()?;

        let span = tracing::debug_span!(
            "spray_fill",
            label = %config.display_label(),
            seed = config.seed
        );
        let mut sweep = Sweep::new(config.sweep_speed, config.looping);
        sweep.park(config.width, config.height);

        Ok(Self {
            paint_rgba: config.color.to_rgba8_straight(),
            background: config.background.to_rgba8_premul(),
            emitter: Emitter::new(config.emitter_params(), config.seed),
            sweep,
            masks: MaskCompositor::new(config.mask.clone()),
            surface: None,
            scheduler,
            pending: None,
            running: false,
            prev_timestamp_ms: None,
            droplets: Vec::new(),
            span,
            config,
        })
    }

    /// Create (or resize) the paint surface at the given device pixel density.
    ///
    /// A new surface starts cleared to the background with the nozzle at the start boundary of
    /// the current direction. Re-attaching at the same density keeps the existing paint.
    #[tracing::instrument(skip(self), fields(seed = self.config.seed))]
    pub fn attach(&mut self, scale: f64) -> SprayResult<()> {
        let desc = SurfaceDesc::new(self.config.width, self.config.height, scale)?;
        if self.surface.as_ref().is_some_and(|s| s.desc() == desc) {
            return Ok(());
        }

        let mut surface = RasterSurface::new(desc);
        surface.clear(self.background);
        self.sweep.park(self.config.width, self.config.height);
        let coverage = self.masks.ensure(desc).coverage();
        self.surface = Some(surface);

        tracing::debug!(
            width = desc.physical_width(),
            height = desc.physical_height(),
            scale = desc.scale,
            mask = self.masks.spec().kind_name(),
            coverage,
            "surface attached"
        );
        Ok(())
    }

    /// Stop the animation and drop the paint surface.
    pub fn detach(&mut self) {
        self.pause();
        if self.surface.take().is_some() {
            let _guard = self.span.enter();
            tracing::debug!("surface detached");
        }
    }

    /// Run one frame for `request`, fired at `timestamp_ms`.
    ///
    /// Requests that are not the currently pending one (cancelled or stale) are ignored and
    /// yield `None`, as does any frame while idle or detached.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) -> Option<FrameStats> {
        if self.pending != Some(request) {
            return None;
        }
        self.pending = None;
        if !self.running {
            return None;
        }

        let span = self.span.clone();
        let _guard = span.enter();

        let Some(surface) = self.surface.as_mut() else {
            self.running = false;
            return None;
        };

        let dt = match self.prev_timestamp_ms {
            Some(prev) => ((timestamp_ms - prev) / 1000.0).max(0.0).min(MAX_FRAME_DT),
            None => 0.0,
        };
        self.prev_timestamp_ms = Some(timestamp_ms);

        let outcome = self.sweep.advance(dt, self.config.width);
        match outcome {
            SweepOutcome::Moving => {}
            SweepOutcome::Reversed => {
                tracing::debug!(direction = ?self.sweep.direction, "sweep reversed");
            }
            SweepOutcome::Finished => {
                self.running = false;
                tracing::debug!(nozzle_x = self.sweep.x, "sweep finished");
            }
        }

        let emitted = self.emitter.emit(
            self.sweep.x,
            dt,
            self.config.height,
            &mut self.droplets,
        );

        if let Err(e) = surface.paint_droplets(&self.droplets, self.paint_rgba) {
            tracing::warn!(error = %e, "droplet paint failed");
        }
        let mask = self.masks.ensure(surface.desc());
        if let Err(e) = surface.apply_mask(mask) {
            tracing::warn!(error = %e, "mask apply failed");
        }

        if self.running {
            self.pending = Some(self.scheduler.request_frame());
        }

        tracing::trace!(
            dt,
            nozzle_x = self.sweep.x,
            emitted = emitted.attempted,
            drawn = emitted.drawn,
            "frame"
        );

        Some(FrameStats {
            dt,
            nozzle_x: self.sweep.x,
            direction: self.sweep.direction,
            outcome,
            emitted: emitted.attempted,
            drawn: emitted.drawn,
            running: self.running,
        })
    }

    /// Construction-time configuration.
    pub fn config(&self) -> &SprayConfig {
        &self.config
    }

    /// Whether a paint surface is attached.
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether the frame loop is scheduled.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current sweep direction.
    pub fn direction(&self) -> SweepDirection {
        self.sweep.direction
    }

    /// Current nozzle position in logical pixels.
    pub fn nozzle(&self) -> Point {
        Point::new(self.sweep.x, self.sweep.y)
    }

    /// The frame request this instance is waiting for, if any.
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Shared access to the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Copy of the accumulated paint, premultiplied. `None` while detached.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.surface.as_ref().map(RasterSurface::snapshot)
    }

    /// The mask layer for the current surface, if one was built.
    pub fn mask_layer(&self) -> Option<&MaskLayer> {
        self.masks.layer()
    }

    /// Number of times the mask has been rasterized.
    pub fn mask_builds(&self) -> u64 {
        self.masks.builds()
    }

    fn cancel_pending(&mut self) {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
    }
}

impl<S: FrameScheduler> SprayControl for SprayFill<S> {
    fn start(&mut self) {
        if self.running || self.surface.is_none() {
            return;
        }
        self.running = true;
        self.prev_timestamp_ms = None;
        self.pending = Some(self.scheduler.request_frame());
        self.span.in_scope(|| {
            tracing::debug!(nozzle_x = self.sweep.x, direction = ?self.sweep.direction, "started");
        });
    }

    fn pause(&mut self) {
        let was_running = std::mem::replace(&mut self.running, false);
        self.cancel_pending();
        if was_running {
            self.span
                .in_scope(|| tracing::debug!(nozzle_x = self.sweep.x, "paused"));
        }
    }

    fn reset(&mut self) {
        self.running = false;
        self.cancel_pending();
        self.prev_timestamp_ms = None;
        self.sweep.direction = SweepDirection::LeftToRight;
        self.sweep.park(self.config.width, self.config.height);
        if let Some(surface) = self.surface.as_mut() {
            surface.clear(self.background);
        }
        self.span.in_scope(|| tracing::debug!("reset"));
    }

    fn set_sweep_direction(&mut self, direction: SweepDirection) {
        self.sweep.direction = direction;
    }
}

impl SprayFill<VirtualScheduler> {
    /// Fire the virtual clock once and run the resulting frame.
    pub fn step_virtual(&mut self) -> Option<FrameStats> {
        let (request, timestamp_ms) = self.scheduler.fire_next()?;
        self.on_frame(request, timestamp_ms)
    }
}

/// Drive `fill` on its virtual clock until it goes idle or `max_frames` frames have run.
pub fn run_virtual(fill: &mut SprayFill<VirtualScheduler>, max_frames: usize) -> Vec<FrameStats> {
    let mut frames = Vec::new();
    while frames.len() < max_frames {
        match fill.step_virtual() {
            Some(stats) => frames.push(stats),
            None => break,
        }
    }
    frames
}

#[cfg(test)]
#[path = "../../tests/unit/driver/fill.rs"]
mod tests;
