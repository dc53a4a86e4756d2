use std::collections::BTreeMap;

use crate::assets::store::BrandingAssets;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{OgError, OgResult, RenderStage};

/// Horizontal anchoring of a text block inside its box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TextAnchor {
    Start,
    End,
}

/// A styled run of text before line breaking.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextBlock {
    pub(crate) text: String,
    pub(crate) weight: u16,
    pub(crate) size_px: f32,
    /// Multiple of `size_px`.
    pub(crate) line_height: f32,
    pub(crate) letter_spacing_px: f32,
    pub(crate) color: Rgba8,
    pub(crate) anchor: TextAnchor,
}

impl TextBlock {
    pub(crate) fn line_box_px(&self) -> f32 {
        self.size_px * self.line_height
    }
}

/// One broken line, positioned relative to the top of its block.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextLine {
    pub(crate) text: String,
    pub(crate) baseline: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ShapedText {
    pub(crate) lines: Vec<TextLine>,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

/// Line breaking and measurement against the branding fonts.
///
/// Owns its Parley contexts, so each render call builds its own; nothing is shared between calls.
pub(crate) struct TextMeasurer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    /// Weight -> family name as registered from that face's bytes.
    families: BTreeMap<u16, String>,
}

impl TextMeasurer {
    /// Register the faces of `family` at each of `weights`.
    ///
    /// Fails with [`OgError::MissingFont`] on the first weight the assets do not provide.
    pub(crate) fn new(assets: &BrandingAssets, family: &str, weights: &[u16]) -> OgResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let mut families = BTreeMap::new();

        for &weight in weights {
            if families.contains_key(&weight) {
                continue;
            }
            let face = assets
                .face(family, weight)
                .ok_or_else(|| OgError::MissingFont {
                    family: family.to_string(),
                    weight,
                })?;

            // Shares the asset bytes; nothing is copied per call.
            let registered = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::new(face.data.clone()), None);
            let family_id = registered.first().map(|(id, _)| *id).ok_or_else(|| {
                OgError::render(
                    RenderStage::Layout,
                    format!("font '{family}' weight {weight} registered no families"),
                )
            })?;
            let name = font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| {
                    OgError::render(RenderStage::Layout, "registered font family has no name")
                })?
                .to_string();
            families.insert(weight, name);
        }

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            families,
        })
    }

    /// Break `block` into lines no wider than `max_width_px` (unbounded when `None`).
    pub(crate) fn shape(
        &mut self,
        block: &TextBlock,
        max_width_px: Option<f32>,
    ) -> OgResult<ShapedText> {
        if block.text.is_empty() {
            return Ok(ShapedText::default());
        }
        if !block.size_px.is_finite() || block.size_px <= 0.0 {
            return Err(OgError::render(
                RenderStage::Layout,
                "text size_px must be finite and > 0",
            ));
        }
        let family = self.families.get(&block.weight).cloned().ok_or_else(|| {
            OgError::render(
                RenderStage::Layout,
                format!("weight {} was not registered for measurement", block.weight),
            )
        })?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &block.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(block.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(block.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            block.letter_spacing_px,
        ));

        let mut layout: parley::Layout<()> = builder.build(&block.text);
        layout.break_all_lines(max_width_px.filter(|w| w.is_finite()));

        let line_box = block.line_box_px();
        let mut lines = Vec::new();
        for (i, line) in layout.lines().enumerate() {
            let range = line.text_range();
            let text = block.text.get(range).unwrap_or_default().trim_end();
            let m = line.metrics();
            // CSS half-leading: the glyph box is centered in the line box.
            let half_leading = (line_box - (m.ascent + m.descent)) / 2.0;
            lines.push(TextLine {
                text: text.to_string(),
                baseline: (i as f32) * line_box + half_leading + m.ascent,
            });
        }

        Ok(ShapedText {
            width: layout.width().ceil(),
            height: line_box * (lines.len() as f32),
            lines,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/text.rs"]
mod tests;
