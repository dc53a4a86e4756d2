//! ogcard renders Open Graph preview cards.
//!
//! A card is a pure function of a small [`PageMetadata`] record and process-wide
//! [`BrandingAssets`] (avatar and font bytes):
//!
//! - Load branding once with [`BrandingAssets::load`] and optionally [`global::install`] it
//! - Call [`render`] (or [`Renderer::render`] for a custom [`CardConfig`]) per page
//! - Serve or write the resulting [`RenderedImage`] PNG, always 1200x630
//!
//! Rendering runs layout (flexbox with real font metrics), emits an SVG document, rasterizes it
//! and encodes PNG. Identical inputs produce byte-identical output.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod card;
mod foundation;
mod page;
mod render;

pub use crate::assets::global;

pub use crate::assets::branding::{BrandingConfig, FontDef, FontSource, normalize_rel_path};
#[cfg(feature = "remote-fonts")]
pub use crate::assets::remote::fetch_google_font;
pub use crate::assets::remote::RemoteFontOpts;
pub use crate::assets::store::{BrandingAssets, FontFace};
pub use crate::card::config::{
    CardConfig, LineHeightStep, Palette, SizeStep, TextStyle, TitleScale, Typography,
};
pub use crate::foundation::core::{
    Canvas, IMMUTABLE_CACHE_CONTROL, OG_HEIGHT, OG_WIDTH, PNG_CONTENT_TYPE, Rgba8,
};
pub use crate::foundation::error::{OgError, OgResult, RenderStage};
pub use crate::foundation::fingerprint::Fingerprint;
pub use crate::page::manifest::{PageEntry, PageManifest, slug_from_title};
pub use crate::page::metadata::PageMetadata;
pub use crate::render::pipeline::{RenderedImage, Renderer, render};
