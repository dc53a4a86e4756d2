use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::assets::branding::{BrandingConfig, FontDef, FontSource, normalize_rel_path};
use crate::foundation::error::{OgError, OgResult};

/// One loaded font face.
#[derive(Clone)]
pub struct FontFace {
    /// Family name the card refers to this face by.
    pub family: String,
    /// CSS weight.
    pub weight: u16,
    /// Raw TrueType/OpenType bytes.
    pub data: Arc<Vec<u8>>,
}

impl FontFace {
    /// Construct a face from owned bytes.
    pub fn new(family: impl Into<String>, weight: u16, data: Vec<u8>) -> Self {
        Self {
            family: family.into(),
            weight,
            data: Arc::new(data),
        }
    }

    pub(crate) fn matches(&self, family: &str, weight: u16) -> bool {
        self.weight == weight && self.family.eq_ignore_ascii_case(family)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Decoded facts about the avatar image needed to embed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AvatarInfo {
    pub(crate) mime: &'static str,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Decode `bytes` far enough to know the image is usable as the avatar.
pub(crate) fn probe_avatar(bytes: &[u8]) -> Result<AvatarInfo, String> {
    if bytes.is_empty() {
        return Err("avatar image is empty".to_string());
    }
    let format = image::guess_format(bytes).map_err(|e| format!("unrecognized avatar: {e}"))?;
    let mime = match format {
        image::ImageFormat::Png => "image/png",
        image::ImageFormat::Jpeg => "image/jpeg",
        image::ImageFormat::WebP => "image/webp",
        image::ImageFormat::Gif => "image/gif",
        other => return Err(format!("unsupported avatar format {other:?}")),
    };
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| format!("decode avatar: {e}"))?;
    if img.width() == 0 || img.height() == 0 {
        return Err("avatar has zero size".to_string());
    }
    Ok(AvatarInfo {
        mime,
        width: img.width(),
        height: img.height(),
    })
}

#[derive(Clone, Copy, Debug)]
struct FaceSlot {
    face: usize,
    id: usvg::fontdb::ID,
}

/// Avatar and fonts shared by every render call.
///
/// Built once at startup and never mutated afterwards; cloning is cheap and shares the bytes.
/// Safe to use from many threads at once.
#[derive(Clone)]
pub struct BrandingAssets {
    avatar: Arc<Vec<u8>>,
    avatar_info: Option<AvatarInfo>,
    faces: Arc<Vec<FontFace>>,
    fontdb: Arc<usvg::fontdb::Database>,
    slots: Arc<Vec<FaceSlot>>,
}

impl std::fmt::Debug for BrandingAssets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandingAssets")
            .field("avatar_len", &self.avatar.len())
            .field("avatar_info", &self.avatar_info)
            .field("faces", &self.faces)
            .finish()
    }
}

impl BrandingAssets {
    /// Build assets from in-memory bytes, validating the avatar and every face.
    pub fn new(avatar: Vec<u8>, faces: Vec<FontFace>) -> OgResult<Self> {
        let info = probe_avatar(&avatar).map_err(OgError::asset_load)?;
        let mut assets = Self::build(avatar, faces)?;
        assets.avatar_info = Some(info);
        Ok(assets)
    }

    /// Build assets without decoding the avatar up front.
    ///
    /// Fonts are still parsed. An unusable avatar surfaces as [`OgError::Avatar`] on each render
    /// call instead of failing here.
    pub fn from_parts_unchecked(avatar: Vec<u8>, faces: Vec<FontFace>) -> OgResult<Self> {
        Self::build(avatar, faces)
    }

    /// Read the avatar and every declared font, resolving paths against `root`.
    ///
    /// Independent files are read concurrently. Any failure aborts the whole load.
    #[tracing::instrument(skip(config), fields(root = %root.display(), fonts = config.fonts.len()))]
    pub fn load(config: &BrandingConfig, root: &Path) -> OgResult<Self> {
        let (avatar, faces) = rayon::join(
            || read_asset(root, &config.avatar),
            || {
                config
                    .fonts
                    .par_iter()
                    .map(|def| load_face(def, root))
                    .collect::<OgResult<Vec<_>>>()
            },
        );
        let avatar = avatar?;
        let faces = faces?;
        let assets = Self::new(avatar, faces)?;
        tracing::debug!(
            faces = assets.faces.len(),
            avatar_bytes = assets.avatar.len(),
            "branding assets loaded"
        );
        Ok(assets)
    }

    fn build(avatar: Vec<u8>, faces: Vec<FontFace>) -> OgResult<Self> {
        if faces.is_empty() {
            return Err(OgError::asset_load("no font faces supplied"));
        }

        let mut db = usvg::fontdb::Database::new();
        let mut slots = Vec::with_capacity(faces.len());
        for (i, face) in faces.iter().enumerate() {
            if face.family.trim().is_empty() {
                return Err(OgError::asset_load(format!("font face #{i} has no family")));
            }
            let source: Arc<dyn AsRef<[u8]> + Send + Sync> = face.data.clone();
            let ids = db.load_font_source(usvg::fontdb::Source::Binary(source));
            let Some(&id) = ids.first() else {
                return Err(OgError::asset_load(format!(
                    "font '{}' weight {} contains no usable face",
                    face.family, face.weight
                )));
            };
            slots.push(FaceSlot { face: i, id });
        }

        Ok(Self {
            avatar: Arc::new(avatar),
            avatar_info: None,
            faces: Arc::new(faces),
            fontdb: Arc::new(db),
            slots: Arc::new(slots),
        })
    }

    /// Raw avatar bytes.
    pub fn avatar_bytes(&self) -> &[u8] {
        &self.avatar
    }

    /// Loaded faces in declaration order.
    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    /// First face declared for `family` at exactly `weight`.
    pub fn face(&self, family: &str, weight: u16) -> Option<&FontFace> {
        self.faces.iter().find(|f| f.matches(family, weight))
    }

    pub(crate) fn avatar_info(&self) -> Result<AvatarInfo, String> {
        match self.avatar_info {
            Some(info) => Ok(info),
            None => probe_avatar(&self.avatar),
        }
    }

    /// `usvg` options that resolve text exclusively against the loaded faces.
    pub(crate) fn usvg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(self.faces.clone(), self.slots.clone()),
            ..Default::default()
        }
    }
}

fn read_asset(root: &Path, rel: &str) -> OgResult<Vec<u8>> {
    let norm = normalize_rel_path(rel).map_err(|e| OgError::asset_load(e.to_string()))?;
    let path = root.join(Path::new(&norm));
    std::fs::read(&path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(|e| OgError::asset_load(format!("{e:#}")))
}

fn load_face(def: &FontDef, root: &Path) -> OgResult<FontFace> {
    let data = match &def.source {
        FontSource::Path(rel) => read_asset(root, rel)?,
        FontSource::GoogleFonts => fetch_remote(def)?,
    };
    tracing::debug!(family = %def.family, weight = def.weight, bytes = data.len(), "font face read");
    Ok(FontFace::new(def.family.clone(), def.weight, data))
}

#[cfg(feature = "remote-fonts")]
fn fetch_remote(def: &FontDef) -> OgResult<Vec<u8>> {
    crate::assets::remote::fetch_google_font(
        &def.family,
        def.weight,
        &crate::assets::remote::RemoteFontOpts::default(),
    )
}

#[cfg(not(feature = "remote-fonts"))]
fn fetch_remote(def: &FontDef) -> OgResult<Vec<u8>> {
    Err(OgError::asset_load(format!(
        "font '{}' weight {} requests google_fonts but ogcard was built without the `remote-fonts` feature",
        def.family, def.weight
    )))
}

fn make_font_resolver(
    faces: Arc<Vec<FontFace>>,
    slots: Arc<Vec<FaceSlot>>,
) -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(move |font, fontdb| {
            let weight = font.weight();
            for family in font.families() {
                let usvg::FontFamily::Named(name) = family else {
                    continue;
                };
                let best = slots
                    .iter()
                    .filter(|s| faces[s.face].family.eq_ignore_ascii_case(name))
                    .min_by_key(|s| (faces[s.face].weight.abs_diff(weight), s.face));
                if let Some(slot) = best {
                    return Some(slot.id);
                }
            }

            let query = usvg::fontdb::Query {
                families: &[usvg::fontdb::Family::SansSerif],
                weight: usvg::fontdb::Weight(weight),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
