use std::time::Instant;

use crate::foundation::core::{Point, SurfaceDesc};
use crate::foundation::error::SprayResult;
use crate::mask::spec::{MaskSpec, TextMaskOptions};
use crate::mask::text::TextLayoutEngine;
use crate::render::composite::alpha_channel;
use crate::render::surface::{affine_to_cpu, bezpath_to_cpu};

/// Per-pixel mask coverage at device resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskLayer {
    desc: SurfaceDesc,
    alpha: Vec<u8>,
}

impl MaskLayer {
    /// Mask that clips nothing.
    pub fn opaque(desc: SurfaceDesc) -> Self {
        Self {
            desc,
            alpha: vec![255; pixel_count(desc)],
        }
    }

    /// Mask that clips everything.
    pub fn empty(desc: SurfaceDesc) -> Self {
        Self {
            desc,
            alpha: vec![0; pixel_count(desc)],
        }
    }

    /// Surface the layer was built for.
    pub fn desc(&self) -> SurfaceDesc {
        self.desc
    }

    /// One coverage byte per device pixel, row-major.
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Coverage at a device pixel.
    pub fn alpha_at(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.desc.physical_width() || y >= self.desc.physical_height() {
            return None;
        }
        let i = (y as usize) * (self.desc.physical_width() as usize) + (x as usize);
        self.alpha.get(i).copied()
    }

    /// Fraction of the surface that lets paint through, weighted by coverage.
    pub fn coverage(&self) -> f64 {
        if self.alpha.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.alpha.iter().map(|&a| u64::from(a)).sum();
        sum as f64 / (self.alpha.len() as f64 * 255.0)
    }
}

fn pixel_count(desc: SurfaceDesc) -> usize {
    (desc.physical_width() as usize).saturating_mul(desc.physical_height() as usize)
}

/// Builds and caches the mask layer for one spray instance.
///
/// The mask spec is fixed at construction; the layer is rebuilt only when the surface
/// descriptor changes.
pub(crate) struct MaskCompositor {
    spec: MaskSpec,
    text: TextLayoutEngine,
    cached: Option<MaskLayer>,
    builds: u64,
}

impl MaskCompositor {
    pub(crate) fn new(spec: MaskSpec) -> Self {
        Self {
            spec,
            text: TextLayoutEngine::new(),
            cached: None,
            builds: 0,
        }
    }

    pub(crate) fn spec(&self) -> &MaskSpec {
        &self.spec
    }

    /// Number of times a layer has been rasterized.
    pub(crate) fn builds(&self) -> u64 {
        self.builds
    }

    pub(crate) fn layer(&self) -> Option<&MaskLayer> {
        self.cached.as_ref()
    }

    /// Return the layer for `desc`, rebuilding it only if the cached one is for another surface.
    ///
    /// Unusable mask parameters produce an empty layer instead of an error.
    pub(crate) fn ensure(&mut self, desc: SurfaceDesc) -> &MaskLayer {
        let stale = self.cached.as_ref().is_none_or(|m| m.desc() != desc);
        if stale {
            let started = Instant::now();
            let layer = match self.build(desc) {
                Ok(layer) => layer,
                Err(e) => {
                    tracing::warn!(
                        kind = self.spec.kind_name(),
                        error = %e,
                        "mask build failed; paint will be fully clipped"
                    );
                    MaskLayer::empty(desc)
                }
            };
            self.builds += 1;
            tracing::debug!(
                kind = self.spec.kind_name(),
                width = desc.physical_width(),
                height = desc.physical_height(),
                coverage = layer.coverage(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "mask rebuilt"
            );
            self.cached = Some(layer);
        }
        self.cached.get_or_insert_with(|| MaskLayer::empty(desc))
    }

    #[tracing::instrument(skip(self), fields(kind = self.spec.kind_name()))]
    fn build(&mut self, desc: SurfaceDesc) -> SprayResult<MaskLayer> {
        match &self.spec {
            MaskSpec::Rect => Ok(MaskLayer::opaque(desc)),
            MaskSpec::Path(builder) => {
                let path = builder.build(desc.width, desc.height);
                Ok(rasterize(desc, |ctx| {
                    ctx.fill_path(&bezpath_to_cpu(&path));
                }))
            }
            MaskSpec::Text(opts) => {
                let opts = opts.clone();
                self.build_text(desc, &opts)
            }
        }
    }

    fn build_text(&mut self, desc: SurfaceDesc, opts: &TextMaskOptions) -> SprayResult<MaskLayer> {
        let font = opts.font_data()?;
        let shaped = self.text.shape(&opts.text, font, opts.size_px)?;
        let origin = shaped.origin_for(
            Point::new(desc.width * 0.5, desc.height * 0.5),
            opts.align,
            opts.baseline,
        );
        tracing::debug!(
            glyphs = shaped.glyph_count(),
            text_width = shaped.width,
            text_height = shaped.height,
            "text mask shaped"
        );

        let font = shaped.font.clone();
        Ok(rasterize(desc, move |ctx| {
            ctx.set_transform(affine_to_cpu(
                desc.device_transform() * kurbo::Affine::translate(origin.to_vec2()),
            ));
            for run in shaped.runs {
                ctx.glyph_run(&font)
                    .font_size(run.font_size)
                    .fill_glyphs(run.glyphs.into_iter());
            }
        }))
    }
}

fn rasterize(desc: SurfaceDesc, draw: impl FnOnce(&mut vello_cpu::RenderContext)) -> MaskLayer {
    let (w, h) = (desc.physical_width(), desc.physical_height());
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(affine_to_cpu(desc.device_transform()));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    MaskLayer {
        desc,
        alpha: alpha_channel(pixmap.data_as_u8_slice()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/compositor.rs"]
mod tests;
