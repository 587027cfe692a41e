//! Premultiplied RGBA8 buffer operations used by the raster surface.

use crate::foundation::error::{SprayError, SprayResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Source-over of `src` onto `dst`, both premultiplied RGBA8 of equal length.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> SprayResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SprayError::surface(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(s[3], mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
    Ok(())
}

/// Destination-in: keep `dst` only where `mask_alpha` is opaque.
///
/// `mask_alpha` holds one coverage byte per pixel of `dst`.
pub(crate) fn destination_in_in_place(dst: &mut [u8], mask_alpha: &[u8]) -> SprayResult<()> {
    if dst.len() != mask_alpha.len().saturating_mul(4) {
        return Err(SprayError::surface(
            "destination_in_in_place expects one mask byte per rgba8 pixel",
        ));
    }
    for (d, &m) in dst.chunks_exact_mut(4).zip(mask_alpha) {
        match m {
            255 => {}
            0 => d.fill(0),
            _ => {
                let w = u16::from(m);
                for c in d.iter_mut() {
                    *c = mul_div255_u8(u16::from(*c), w);
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn fill_rgba8(dst: &mut [u8], rgba: [u8; 4]) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Extract the alpha channel of an RGBA8 buffer.
pub(crate) fn alpha_channel(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4).map(|px| px[3]).collect()
}

/// Convert premultiplied RGBA8 to straight alpha, e.g. for PNG encoding.
pub fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
