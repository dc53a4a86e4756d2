use std::time::Instant;

use crate::assets::store::BrandingAssets;
use crate::card::config::CardConfig;
use crate::card::layout::CardTree;
use crate::card::svg::{AvatarEmbed, write_card_svg};
use crate::card::text::TextMeasurer;
use crate::foundation::core::{Canvas, IMMUTABLE_CACHE_CONTROL, PNG_CONTENT_TYPE};
use crate::foundation::error::{OgError, OgResult};
use crate::page::metadata::PageMetadata;
use crate::render::raster::{encode_png, parse_svg, rasterize_to_width};

/// An encoded card.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Pixel width, always [`crate::OG_WIDTH`].
    pub width: u32,
    /// Pixel height, always [`crate::OG_HEIGHT`].
    pub height: u32,
    /// PNG bytes.
    pub png: Vec<u8>,
}

impl RenderedImage {
    /// `Content-Type` to serve the bytes with.
    pub fn content_type(&self) -> &'static str {
        PNG_CONTENT_TYPE
    }

    /// `Cache-Control` to serve the bytes with.
    pub fn cache_control(&self) -> &'static str {
        IMMUTABLE_CACHE_CONTROL
    }
}

impl std::fmt::Debug for RenderedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// Card renderer bound to one validated [`CardConfig`].
///
/// Holds no per-call state; one renderer can serve any number of threads.
#[derive(Clone, Debug)]
pub struct Renderer {
    config: CardConfig,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            config: CardConfig::default(),
        }
    }
}

impl Renderer {
    /// Validate `config` and build a renderer for it.
    pub fn new(config: CardConfig) -> OgResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration cards are drawn with.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Render `meta` to a 1200x630 PNG.
    ///
    /// Failures affect this call only and leave `assets` untouched.
    #[tracing::instrument(skip_all, fields(title = %meta.title, breadcrumb = %meta.breadcrumb))]
    pub fn render(&self, meta: &PageMetadata, assets: &BrandingAssets) -> OgResult<RenderedImage> {
        let canvas = Canvas::OG;
        let started = Instant::now();

        let svg = self.render_svg(meta, assets)?;
        let tree = parse_svg(&svg, &assets.usvg_options())?;
        let rgba = rasterize_to_width(&tree, canvas)?;
        let png = encode_png(rgba, canvas)?;

        tracing::debug!(
            svg_bytes = svg.len(),
            png_bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "card rendered"
        );
        Ok(RenderedImage {
            width: canvas.width,
            height: canvas.height,
            png,
        })
    }

    /// Lay out `meta` and return the intermediate SVG document.
    pub fn render_svg(&self, meta: &PageMetadata, assets: &BrandingAssets) -> OgResult<String> {
        let tree = CardTree::compose(meta, &self.config);
        let family = &self.config.typography.family;
        let mut measurer = TextMeasurer::new(assets, family, &tree.required_weights())?;
        let laid_out = tree.layout(&mut measurer)?;

        let info = assets.avatar_info().map_err(OgError::avatar)?;
        let avatar = AvatarEmbed {
            mime: info.mime,
            bytes: assets.avatar_bytes(),
        };
        write_card_svg(&laid_out, avatar, family)
    }
}

/// Render `meta` with the default card design.
pub fn render(meta: &PageMetadata, assets: &BrandingAssets) -> OgResult<RenderedImage> {
    Renderer::default().render(meta, assets)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
