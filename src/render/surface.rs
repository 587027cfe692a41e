use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, Rgba8Premul, SurfaceDesc};
use crate::foundation::error::{SprayError, SprayResult};
use crate::mask::compositor::MaskLayer;
use crate::render::composite::{
    destination_in_in_place, fill_rgba8, premul_over_in_place, unpremultiply_rgba8,
};
use crate::spray::emitter::Droplet;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in device pixels.
    pub width: u32,
    /// Frame height in device pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data.
    pub fn to_straight(&self) -> Vec<u8> {
        if self.premultiplied {
            unpremultiply_rgba8(&self.data)
        } else {
            self.data.clone()
        }
    }

    /// RGBA8 at a device pixel, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// CPU paint accumulation surface.
///
/// Droplets are rasterized by `vello_cpu` into a scratch layer each frame and composited over
/// the accumulated paint, so paint from earlier frames is never re-rasterized.
pub(crate) struct RasterSurface {
    desc: SurfaceDesc,
    ctx: vello_cpu::RenderContext,
    paint: vello_cpu::Pixmap,
    layer: vello_cpu::Pixmap,
}

impl RasterSurface {
    pub(crate) fn new(desc: SurfaceDesc) -> Self {
        let (w, h) = (desc.physical_width(), desc.physical_height());
        Self {
            desc,
            ctx: vello_cpu::RenderContext::new(w, h),
            paint: vello_cpu::Pixmap::new(w, h),
            layer: vello_cpu::Pixmap::new(w, h),
        }
    }

    pub(crate) fn desc(&self) -> SurfaceDesc {
        self.desc
    }

    /// Replace every pixel with `color`.
    pub(crate) fn clear(&mut self, color: Rgba8Premul) {
        fill_rgba8(self.paint.data_as_u8_slice_mut(), color.to_array());
    }

    /// Fill each droplet as an opaque circle of straight-alpha `rgba`.
    pub(crate) fn paint_droplets(&mut self, droplets: &[Droplet], rgba: [u8; 4]) -> SprayResult<()> {
        if droplets.is_empty() {
            return Ok(());
        }

        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_transform(affine_to_cpu(self.desc.device_transform()));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        for d in droplets {
            let circle = vello_cpu::kurbo::Circle::new((d.center.x, d.center.y), d.radius);
            ctx.fill_path(&circle.to_path(CIRCLE_TOLERANCE));
        }
        ctx.flush();

        self.layer.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.layer);
        premul_over_in_place(
            self.paint.data_as_u8_slice_mut(),
            self.layer.data_as_u8_slice(),
        )
    }

    /// Keep accumulated paint only where `mask` is opaque.
    pub(crate) fn apply_mask(&mut self, mask: &MaskLayer) -> SprayResult<()> {
        if mask.desc() != self.desc {
            return Err(SprayError::surface(
                "mask layer was built for a different surface",
            ));
        }
        destination_in_in_place(self.paint.data_as_u8_slice_mut(), mask.alpha())
    }

    pub(crate) fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.desc.physical_width()),
            height: u32::from(self.desc.physical_height()),
            data: self.paint.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
