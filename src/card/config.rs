use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{OgError, OgResult};

/// Color tokens shared by every row of the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Card surface.
    pub background: Rgba8,
    /// Frame around the card and badge fill.
    pub secondary: Rgba8,
    /// Headline text.
    pub foreground: Rgba8,
    /// Brand name, badge, description and footer text.
    pub muted_foreground: Rgba8,
    /// Card outline and row separators.
    pub border: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(0xff, 0xff, 0xff),
            secondary: Rgba8::rgb(0xfa, 0xfa, 0xfa),
            foreground: Rgba8::rgb(0x17, 0x17, 0x17),
            muted_foreground: Rgba8::rgb(0x73, 0x73, 0x73),
            border: Rgba8::rgb(0xe5, 0xe5, 0xe5),
        }
    }
}

/// Font family and the CSS weight used by each text element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    /// Family name, as declared for the loaded font faces.
    pub family: String,
    /// Title weight.
    pub title_weight: u16,
    /// Weight of a description promoted to headline.
    pub headline_weight: u16,
    /// Weight of a secondary description.
    pub description_weight: u16,
    /// Brand name weight.
    pub brand_weight: u16,
    /// Badge label weight.
    pub badge_weight: u16,
    /// Footer label weight.
    pub footer_weight: u16,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            title_weight: 900,
            headline_weight: 900,
            description_weight: 400,
            brand_weight: 600,
            badge_weight: 500,
            footer_weight: 400,
        }
    }
}

/// Title font size applied to titles up to `max_chars` characters long.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeStep {
    /// Inclusive upper bound on title length, in characters.
    pub max_chars: usize,
    /// Font size in pixels.
    pub size_px: f32,
}

/// Line-height ratio applied to font sizes of at least `min_size_px`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineHeightStep {
    /// Inclusive lower bound on font size.
    pub min_size_px: f32,
    /// Line height as a multiple of the font size.
    pub ratio: f32,
}

/// Step function from title length to font size, and from font size to line height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleScale {
    /// Ascending by `max_chars`, non-increasing by `size_px`.
    pub steps: Vec<SizeStep>,
    /// Size for every title longer than the last step.
    pub floor_px: f32,
    /// Descending by `min_size_px`.
    pub line_heights: Vec<LineHeightStep>,
    /// Ratio for sizes below every line-height step.
    pub base_line_height: f32,
    /// Letter spacing as a fraction of the font size.
    pub letter_spacing_em: f32,
}

impl Default for TitleScale {
    fn default() -> Self {
        let step = |max_chars, size_px| SizeStep { max_chars, size_px };
        let lh = |min_size_px, ratio| LineHeightStep { min_size_px, ratio };
        Self {
            steps: vec![
                step(25, 110.0),
                step(40, 92.0),
                step(60, 80.0),
                step(80, 72.0),
                step(100, 64.0),
            ],
            floor_px: 56.0,
            line_heights: vec![lh(80.0, 1.3), lh(64.0, 1.4), lh(48.0, 1.45)],
            base_line_height: 1.5,
            letter_spacing_em: -0.02,
        }
    }
}

/// Fixed style of a single text element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

/// Every tunable of the card design in one record.
///
/// The canvas size is not configurable; cards are always 1200x630.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Color tokens.
    pub palette: Palette,
    /// Font family and weights.
    pub typography: Typography,
    /// Title sizing.
    pub title: TitleScale,
    /// Description when it takes the headline slot.
    pub headline: TextStyle,
    /// Description below a title.
    pub description: TextStyle,
    /// Brand name next to the avatar.
    pub brand: TextStyle,
    /// Badge label.
    pub badge: TextStyle,
    /// Footer label.
    pub footer: TextStyle,
    /// Name shown next to the avatar.
    pub brand_name: String,
    /// Site identifier in the footer. Empty leaves the footer row blank.
    pub site_label: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        let style = |size_px, line_height| TextStyle {
            size_px,
            line_height,
        };
        Self {
            palette: Palette::default(),
            typography: Typography::default(),
            title: TitleScale::default(),
            headline: style(64.0, 1.2),
            description: style(36.0, 1.4),
            brand: style(36.0, 1.2),
            badge: style(28.0, 1.2),
            footer: style(24.0, 1.2),
            brand_name: "Yasin Kavakli".to_string(),
            site_label: String::new(),
        }
    }
}

impl CardConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> OgResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| OgError::validation(format!("card config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the step functions are monotonic and every size is usable.
    pub fn validate(&self) -> OgResult<()> {
        fn positive(name: &str, v: f32) -> OgResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(OgError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
            Ok(())
        }

        let t = &self.title;
        if t.steps.is_empty() {
            return Err(OgError::validation("title.steps must not be empty"));
        }
        for s in &t.steps {
            positive("title step size_px", s.size_px)?;
        }
        for pair in t.steps.windows(2) {
            if pair[1].max_chars <= pair[0].max_chars {
                return Err(OgError::validation(
                    "title.steps must be strictly ascending by max_chars",
                ));
            }
            if pair[1].size_px > pair[0].size_px {
                return Err(OgError::validation(
                    "title.steps must be non-increasing by size_px",
                ));
            }
        }
        positive("title.floor_px", t.floor_px)?;
        if let Some(last) = t.steps.last()
            && t.floor_px > last.size_px
        {
            return Err(OgError::validation(
                "title.floor_px must not exceed the last step size",
            ));
        }

        for s in &t.line_heights {
            positive("title line height min_size_px", s.min_size_px)?;
            positive("title line height ratio", s.ratio)?;
        }
        for pair in t.line_heights.windows(2) {
            if pair[1].min_size_px >= pair[0].min_size_px {
                return Err(OgError::validation(
                    "title.line_heights must be strictly descending by min_size_px",
                ));
            }
        }
        positive("title.base_line_height", t.base_line_height)?;
        if !t.letter_spacing_em.is_finite() {
            return Err(OgError::validation("title.letter_spacing_em must be finite"));
        }

        for (name, style) in [
            ("headline", self.headline),
            ("description", self.description),
            ("brand", self.brand),
            ("badge", self.badge),
            ("footer", self.footer),
        ] {
            positive(&format!("{name}.size_px"), style.size_px)?;
            positive(&format!("{name}.line_height"), style.line_height)?;
        }

        if self.typography.family.trim().is_empty() {
            return Err(OgError::validation("typography.family must be non-empty"));
        }
        let ty = &self.typography;
        for w in [
            ty.title_weight,
            ty.headline_weight,
            ty.description_weight,
            ty.brand_weight,
            ty.badge_weight,
            ty.footer_weight,
        ] {
            if !(1..=1000).contains(&w) {
                return Err(OgError::validation(format!(
                    "font weight {w} is outside 1..=1000"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/config.rs"]
mod tests;
