use crate::foundation::error::{SprayError, SprayResult};

pub use kurbo::{Affine, BezPath, Point};

/// Logical surface size plus device pixel density.
///
/// All spray algorithms run in logical coordinates; only the raster surfaces care about the
/// physical pixel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceDesc {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
    /// Device pixels per logical pixel, never below 1.0.
    pub scale: f64,
    physical_width: u16,
    physical_height: u16,
}

impl SurfaceDesc {
    /// Create a validated descriptor. Scale factors below 1.0 (or non-finite) are treated as 1.0.
    pub fn new(width: f64, height: f64, scale: f64) -> SprayResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(SprayError::validation(
                "surface width/height must be finite and > 0",
            ));
        }
        let scale = if scale.is_finite() { scale.max(1.0) } else { 1.0 };

        let pw = (width * scale).floor();
        let ph = (height * scale).floor();
        if pw < 1.0 || ph < 1.0 {
            return Err(SprayError::surface(format!(
                "surface {width}x{height}@{scale} rounds to zero device pixels"
            )));
        }
        if pw > f64::from(u16::MAX) || ph > f64::from(u16::MAX) {
            return Err(SprayError::surface(format!(
                "surface {pw}x{ph} exceeds the maximum pixmap size"
            )));
        }

        Ok(Self {
            width,
            height,
            scale,
            physical_width: pw as u16,
            physical_height: ph as u16,
        })
    }

    /// Physical width in device pixels.
    pub fn physical_width(self) -> u16 {
        self.physical_width
    }

    /// Physical height in device pixels.
    pub fn physical_height(self) -> u16 {
        self.physical_height
    }

    /// Byte length of a tightly packed RGBA8 buffer at physical resolution.
    pub fn byte_len(self) -> usize {
        (self.physical_width as usize)
            .saturating_mul(self.physical_height as usize)
            .saturating_mul(4)
    }

    /// Logical-to-device transform.
    pub fn device_transform(self) -> Affine {
        Affine::scale(self.scale)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
