use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::SprayError;
use serde::{Deserialize, Serialize};

/// Straight-alpha colour with normalized `0..=1` channels.
///
/// Deserializes from `"#RGB"`, `"#RRGGBB"`, `"#RRGGBBAA"`, `"transparent"`, `{r,g,b,a}`, `{h,s,l,a}` or
/// `[r,g,b]` / `[r,g,b,a]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Build from normalized channels.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// Parse a hex colour or the `transparent` keyword.
    pub fn parse(s: &str) -> Result<Self, SprayError> {
        parse_str(s).map_err(SprayError::validation)
    }

    /// Quantize into straight-alpha RGBA8.
    pub fn to_rgba8_straight(self) -> [u8; 4] {
        [
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b),
            to_u8(self.a),
        ]
    }

    /// Quantize into premultiplied RGBA8.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        let a = self.a.clamp(0.0, 1.0);
        let r = (self.r.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let g = (self.g.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let b = (self.b.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);

        Rgba8Premul {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
            a: to_u8(a),
        }
    }
}

fn to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl std::str::FromStr for Color {
    type Err = SprayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            HslaObj {
                h: f64,
                s: f64,
                l: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => parse_str(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::HslaObj { h, s, l, a } => Ok(hsla_to_rgba(h, s, l, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgba(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_str(s: &str) -> Result<Color, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("transparent") {
        return Ok(Color::transparent());
    }
    parse_hex(s)
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    let nibbles = digits
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| format!("invalid hex colour \"{s}\""))?;

    // Short forms repeat each nibble: `#abc` == `#aabbcc`.
    let channels: Vec<u8> = match nibbles.len() {
        3 | 4 => nibbles.iter().map(|&n| n * 17).collect(),
        6 | 8 => nibbles.chunks_exact(2).map(|p| p[0] * 16 + p[1]).collect(),
        _ => {
            return Err(format!(
                "hex colour \"{s}\" must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA"
            ));
        }
    };
    let unit = |i: usize| channels.get(i).map_or(1.0, |&c| f64::from(c) / 255.0);
    Ok(Color::rgba(unit(0), unit(1), unit(2), unit(3)))
}

/// CSS `hsl()` conversion; `h` in degrees, `s`/`l` in `0..=1`.
fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> Color {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let h = h.rem_euclid(360.0);
    let k = s * l.min(1.0 - l);
    let channel = |n: f64| {
        let t = (n + h / 30.0) % 12.0;
        l - k * (t - 3.0).min(9.0 - t).clamp(-1.0, 1.0)
    };
    Color::rgba(channel(0.0), channel(8.0), channel(4.0), a)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
