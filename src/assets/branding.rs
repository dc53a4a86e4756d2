use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::card::config::CardConfig;
use crate::foundation::error::{OgError, OgResult};

/// Where the bytes of a font face come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSource {
    /// File relative to the branding file.
    Path(String),
    /// Google Fonts CSS2 API, fetched once at load time (feature `remote-fonts`).
    GoogleFonts,
}

/// Declared font face: the family/weight the card asks for, and where to get it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDef {
    /// Family name used by [`crate::Typography::family`].
    pub family: String,
    /// CSS weight (100..=900).
    pub weight: u16,
    /// Byte source.
    pub source: FontSource,
}

/// Deployment-level branding file: avatar, fonts and optional card design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrandingConfig {
    /// Avatar image path relative to the branding file.
    pub avatar: String,
    /// Font faces in declaration order.
    pub fonts: Vec<FontDef>,
    /// Card design; defaults apply when absent.
    #[serde(default)]
    pub card: Option<CardConfig>,
}

impl BrandingConfig {
    /// Parse branding JSON.
    pub fn from_json_str(s: &str) -> OgResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| OgError::asset_load(format!("branding config: {e}")))?;
        if cfg.fonts.is_empty() {
            return Err(OgError::asset_load("branding config declares no fonts"));
        }
        if let Some(card) = &cfg.card {
            card.validate()?;
        }
        Ok(cfg)
    }

    /// Read a branding file. Returns the config and the directory its paths are relative to.
    pub fn from_path(path: &Path) -> OgResult<(Self, PathBuf)> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read branding config '{}'", path.display()))
            .map_err(|e| OgError::asset_load(format!("{e:#}")))?;
        let cfg = Self::from_json_str(&text)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok((cfg, root))
    }

    /// Card design to render with.
    pub fn card_config(&self) -> CardConfig {
        self.card.clone().unwrap_or_default()
    }
}

/// Resolve an avatar or font path declared in a branding file to a clean relative form.
///
/// Separators become `/` and `.` segments disappear. Paths that could leave the branding
/// directory are rejected: absolute paths, drive prefixes such as `C:` and `..` segments.
pub fn normalize_rel_path(source: &str) -> OgResult<String> {
    let unified = source.trim().replace('\\', "/");
    let reject = |why: &str| {
        Err(OgError::validation(format!(
            "branding asset path '{source}' {why}"
        )))
    };
    if unified.starts_with('/') {
        return reject("is absolute; paths are relative to the branding file");
    }

    let segments: Vec<&str> = unified
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect();
    if segments.iter().any(|seg| *seg == "..") {
        return reject("escapes the branding directory");
    }
    if segments.first().is_some_and(|seg| seg.ends_with(':')) {
        return reject("has a drive prefix; paths are relative to the branding file");
    }
    if segments.is_empty() {
        return reject("does not name a file");
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/branding.rs"]
mod tests;
