use std::path::Path;

use serde::Deserialize;

use crate::foundation::color::Color;
use crate::foundation::error::{SprayError, SprayResult};
use crate::mask::spec::MaskSpec;
use crate::spray::emitter::{DropletSize, EmitterParams, MIN_DROPLET_RADIUS};

/// Construction-time configuration for one spray instance.
///
/// Every field is optional in JSON; missing fields take the defaults below. Unknown keys (such as
/// the retired `alpha_min` / `alpha_max` opacity knobs) are ignored.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SprayConfig {
    /// Logical surface width.
    pub width: f64,
    /// Logical surface height.
    pub height: f64,
    /// Paint colour. Droplets are solid discs of this colour; there is no per-droplet opacity.
    pub color: Color,
    /// Colour the surface is cleared to on attach and reset.
    pub background: Color,
    /// Droplets per second.
    pub flow_rate: f64,
    /// Horizontal spread sigma around the nozzle, logical pixels.
    pub nozzle_radius: f64,
    /// Mean droplet radius.
    pub droplet_mean: f64,
    /// Droplet radius standard deviation.
    pub droplet_sigma: f64,
    /// Minimum base droplet radius.
    pub droplet_min: f64,
    /// Maximum droplet radius.
    pub droplet_max: f64,
    /// Nozzle speed, logical pixels per second.
    pub sweep_speed: f64,
    /// Bounce between boundaries instead of stopping at the far one.
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Clip silhouette.
    pub mask: MaskSpec,
    /// Random seed. `0` is remapped to a fixed non-zero constant.
    pub seed: u32,
    /// Free-form identifier carried into log spans.
    pub label: Option<String>,
}

impl Default for SprayConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 300.0,
            color: Color::rgba(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 1.0),
            background: Color::transparent(),
            flow_rate: 2500.0,
            nozzle_radius: 12.0,
            droplet_mean: 1.6,
            droplet_sigma: 0.6,
            droplet_min: 0.6,
            droplet_max: 3.0,
            sweep_speed: 220.0,
            looping: false,
            mask: MaskSpec::Rect,
            seed: 1337,
            label: None,
        }
    }
}

impl SprayConfig {
    /// Parse a JSON configuration. Relative font paths are left untouched.
    pub fn from_json_str(s: &str) -> SprayResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| SprayError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON configuration file. Relative font paths resolve against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> SprayResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SprayError::validation(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_json_str(&text)?;
        if let MaskSpec::Text(opts) = &mut cfg.mask {
            opts.resolve_relative_to(path.parent().unwrap_or_else(|| Path::new(".")));
        }
        Ok(cfg)
    }

    /// Check numeric parameters. Mask parameters are not checked here; unusable ones fall back
    /// to an empty mask when the surface is attached.
    pub fn validate(&self) -> SprayResult<()> {
        fn positive(name: &str, v: f64) -> SprayResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(SprayError::validation(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
            Ok(())
        }
        fn non_negative(name: &str, v: f64) -> SprayResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(SprayError::validation(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
            Ok(())
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        non_negative("flow_rate", self.flow_rate)?;
        non_negative("nozzle_radius", self.nozzle_radius)?;
        non_negative("sweep_speed", self.sweep_speed)?;
        non_negative("droplet_mean", self.droplet_mean)?;
        non_negative("droplet_sigma", self.droplet_sigma)?;
        non_negative("droplet_min", self.droplet_min)?;
        non_negative("droplet_max", self.droplet_max)?;

        if self.droplet_min > self.droplet_max {
            return Err(SprayError::validation(format!(
                "droplet_min ({}) must be <= droplet_max ({})",
                self.droplet_min, self.droplet_max
            )));
        }
        if self.droplet_max < MIN_DROPLET_RADIUS {
            return Err(SprayError::validation(format!(
                "droplet_max must be >= {MIN_DROPLET_RADIUS}"
            )));
        }
        Ok(())
    }

    /// Emitter parameters derived from this configuration.
    pub fn emitter_params(&self) -> EmitterParams {
        EmitterParams {
            flow_rate: self.flow_rate,
            nozzle_radius: self.nozzle_radius,
            size: DropletSize {
                mean: self.droplet_mean,
                sigma: self.droplet_sigma,
                min: self.droplet_min,
                max: self.droplet_max,
            },
        }
    }

    /// Label used in logs; falls back to the seed.
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("seed-{}", self.seed))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
