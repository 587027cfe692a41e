use std::sync::Arc;

use crate::foundation::core::Point;
use crate::foundation::error::{SprayError, SprayResult};
use crate::mask::spec::{TextAlign, TextBaseline};

/// Brush carried through Parley layouts. Masks are monochrome, so it holds nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MaskBrush;

/// One shaped run, flattened for drawing.
pub(crate) struct ShapedRun {
    pub(crate) font_size: f32,
    /// Glyph positions relative to the layout's top-left corner.
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
}

/// A shaped single-paragraph text block ready to be filled into a mask.
pub(crate) struct ShapedText {
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) runs: Vec<ShapedRun>,
    pub(crate) width: f64,
    pub(crate) height: f64,
    /// Baseline of the first line measured from the layout top.
    pub(crate) first_baseline: f64,
    /// Descent of the first line.
    pub(crate) first_descent: f64,
}

impl ShapedText {
    /// Top-left corner that anchors this block at `anchor` with the given alignment.
    pub(crate) fn origin_for(&self, anchor: Point, align: TextAlign, baseline: TextBaseline) -> Point {
        let x = anchor.x - self.width * align.anchor_fraction();
        let y = match baseline {
            TextBaseline::Top => anchor.y,
            TextBaseline::Middle => anchor.y - self.height * 0.5,
            TextBaseline::Alphabetic => anchor.y - self.first_baseline,
            TextBaseline::Bottom => anchor.y - (self.first_baseline + self.first_descent),
        };
        Point::new(x, y)
    }

    pub(crate) fn glyph_count(&self) -> usize {
        self.runs.iter().map(|r| r.glyphs.len()).sum()
    }
}

/// Stateful helper for shaping text from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<MaskBrush>,
    /// Font bytes already in the collection and the family name they registered.
    registered: Option<(Arc<Vec<u8>>, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: None,
        }
    }

    /// Number of font families known to the collection.
    #[cfg(test)]
    pub(crate) fn family_count(&mut self) -> usize {
        self.font_ctx.collection.family_names().count()
    }

    fn family_for(&mut self, font_bytes: &Arc<Vec<u8>>) -> SprayResult<String> {
        if let Some((bytes, name)) = &self.registered
            && (Arc::ptr_eq(bytes, font_bytes) || bytes == font_bytes)
        {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SprayError::text("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SprayError::text("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family_name, "font registered");
        self.registered = Some((Arc::clone(font_bytes), family_name.clone()));
        Ok(family_name)
    }

    /// Shape `text` with the font in `font_bytes` at `size_px`, without line wrapping.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        font_bytes: Arc<Vec<u8>>,
        size_px: f64,
    ) -> SprayResult<ShapedText> {
        if text.trim().is_empty() {
            return Err(SprayError::text("text mask string is empty"));
        }
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SprayError::text("text size_px must be finite and > 0"));
        }

        let family_name = self.family_for(&font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(MaskBrush));

        let mut layout: parley::Layout<MaskBrush> = builder.build(text);
        layout.break_all_lines(None);

        let (first_baseline, first_descent) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (f64::from(m.baseline), f64::from(m.descent))
            })
            .unwrap_or((0.0, 0.0));

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .positioned_glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                runs.push(ShapedRun {
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );

        Ok(ShapedText {
            font,
            runs,
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            first_baseline,
            first_descent,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/text.rs"]
mod tests;
