use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use kurbo::Shape;
use serde::Deserialize;

use crate::foundation::core::{Affine, BezPath};
use crate::foundation::error::{SprayError, SprayResult};

/// Silhouette the accumulated paint is clipped to.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskSpec {
    /// Fully opaque over the whole surface.
    #[default]
    #[serde(alias = "full_rect")]
    Rect,
    /// Glyphs of a text string, centred on the surface.
    Text(TextMaskOptions),
    /// An arbitrary vector path built from the surface's logical size.
    Path(PathBuilder),
}

impl MaskSpec {
    /// Text mask with default size/alignment; attach a font with [`TextMaskOptions::with_font_bytes`]
    /// or [`TextMaskOptions::with_font_path`].
    pub fn text(options: TextMaskOptions) -> Self {
        Self::Text(options)
    }

    /// Path mask from a closure receiving `(width, height)` in logical pixels.
    pub fn path<F>(build: F) -> Self
    where
        F: Fn(f64, f64) -> BezPath + Send + Sync + 'static,
    {
        Self::Path(PathBuilder::new(build))
    }

    /// Short name used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Text(_) => "text",
            Self::Path(_) => "path",
        }
    }
}

/// Horizontal anchoring of the text relative to the surface centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Text starts at the centre line.
    #[serde(alias = "start")]
    Left,
    /// Text is centred on the centre line.
    #[default]
    Center,
    /// Text ends at the centre line.
    #[serde(alias = "end")]
    Right,
}

impl TextAlign {
    /// Fraction of the text advance that sits left of the anchor.
    pub(crate) fn anchor_fraction(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Vertical anchoring of the text relative to the surface centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBaseline {
    /// Top of the line box sits on the centre line.
    #[serde(alias = "hanging")]
    Top,
    /// Line box is centred on the centre line.
    #[default]
    Middle,
    /// Alphabetic baseline sits on the centre line.
    Alphabetic,
    /// Bottom of the descender sits on the centre line.
    #[serde(alias = "ideographic")]
    Bottom,
}

/// Parameters for [`MaskSpec::Text`].
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TextMaskOptions {
    /// String to render.
    pub text: String,
    /// Font file to load when no in-memory font is attached.
    pub font_path: Option<PathBuf>,
    /// Font size in logical pixels.
    pub size_px: f64,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    #[serde(skip)]
    font_bytes: Option<Arc<Vec<u8>>>,
}

impl Default for TextMaskOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_path: None,
            size_px: 160.0,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            font_bytes: None,
        }
    }
}

impl fmt::Debug for TextMaskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextMaskOptions")
            .field("text", &self.text)
            .field("font_path", &self.font_path)
            .field("font_bytes", &self.font_bytes.as_ref().map(|b| b.len()))
            .field("size_px", &self.size_px)
            .field("align", &self.align)
            .field("baseline", &self.baseline)
            .finish()
    }
}

impl TextMaskOptions {
    /// Options for `text` with default size and centred alignment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach raw TrueType/OpenType bytes.
    pub fn with_font_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.font_bytes = Some(Arc::new(bytes.into()));
        self
    }

    /// Load the font from `path` at mask build time.
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Font size in logical pixels.
    pub fn with_size_px(mut self, size_px: f64) -> Self {
        self.size_px = size_px;
        self
    }

    /// Horizontal alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Vertical alignment.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Resolve font bytes, reading `font_path` if nothing is attached in memory.
    pub(crate) fn font_data(&self) -> SprayResult<Arc<Vec<u8>>> {
        if let Some(bytes) = &self.font_bytes {
            return Ok(bytes.clone());
        }
        let Some(path) = &self.font_path else {
            return Err(SprayError::text("text mask has no font"));
        };
        std::fs::read(path).map(Arc::new).map_err(|e| {
            SprayError::text(format!("failed to read font '{}': {e}", path.display()))
        })
    }

    pub(crate) fn resolve_relative_to(&mut self, base: &std::path::Path) {
        if let Some(p) = &self.font_path
            && p.is_relative()
        {
            self.font_path = Some(base.join(p));
        }
    }
}

type BuildFn = dyn Fn(f64, f64) -> BezPath + Send + Sync;

/// Produces the clip path for a given logical `(width, height)`.
///
/// Deserializes from `{"svg": "<path data>", "fit": bool}`. With `fit`, the parsed path's
/// bounding box is stretched onto the full surface.
#[derive(Clone)]
pub struct PathBuilder {
    build: Arc<BuildFn>,
    label: &'static str,
}

impl PathBuilder {
    /// Wrap a closure.
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(f64, f64) -> BezPath + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
            label: "closure",
        }
    }

    /// Parse SVG path data once; the same path is used for every size unless `fit` is set.
    pub fn from_svg(d: &str, fit: bool) -> SprayResult<Self> {
        let path = BezPath::from_svg(d.trim())
            .map_err(|e| SprayError::validation(format!("invalid svg path data: {e}")))?;
        let build = move |w: f64, h: f64| {
            if !fit {
                return path.clone();
            }
            let bb = path.bounding_box();
            if bb.width() <= 0.0 || bb.height() <= 0.0 {
                return path.clone();
            }
            let to_surface = Affine::scale_non_uniform(w / bb.width(), h / bb.height())
                * Affine::translate((-bb.x0, -bb.y0));
            to_surface * path.clone()
        };
        Ok(Self {
            build: Arc::new(build),
            label: "svg",
        })
    }

    /// Build the path for a surface of the given logical size.
    pub fn build(&self, width: f64, height: f64) -> BezPath {
        (self.build)(width, height)
    }
}

impl fmt::Debug for PathBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathBuilder")
            .field("source", &self.label)
            .finish()
    }
}

impl<'de> Deserialize<'de> for PathBuilder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Repr {
            svg: String,
            #[serde(default)]
            fit: bool,
        }

        let repr = Repr::deserialize(deserializer)?;
        PathBuilder::from_svg(&repr.svg, repr.fit).map_err(serde::de::Error::custom)
    }
}
