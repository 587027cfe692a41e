pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// `min(max(n, lo), hi)`; unlike `f64::clamp` this never panics when `lo > hi`.
pub(crate) fn clamp_f64(n: f64, lo: f64, hi: f64) -> f64 {
    n.max(lo).min(hi)
}
