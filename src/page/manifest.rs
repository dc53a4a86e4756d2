use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{OgError, OgResult};
use crate::page::metadata::PageMetadata;

/// One routable page in a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Output slug. Derived from the title when absent.
    #[serde(default)]
    pub slug: Option<String>,
    /// Unpublished pages are skipped unless drafts are requested.
    #[serde(default)]
    pub draft: bool,
    /// Card metadata.
    #[serde(flatten)]
    pub meta: PageMetadata,
}

impl PageEntry {
    /// Explicit slug or one derived from the title.
    pub fn resolved_slug(&self) -> OgResult<String> {
        let slug = match &self.slug {
            Some(s) => s.trim().to_string(),
            None => slug_from_title(&self.meta.title),
        };
        if slug.is_empty() {
            return Err(OgError::validation(format!(
                "page '{}' has no slug and its title does not produce one",
                self.meta.title
            )));
        }
        if slug.contains('/') || slug.contains('\\') || slug == "." || slug == ".." {
            return Err(OgError::validation(format!(
                "slug '{slug}' must be a single path segment"
            )));
        }
        Ok(slug)
    }
}

/// Page list supplied by the site's content layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageManifest {
    /// Pages in declaration order.
    pub pages: Vec<PageEntry>,
}

impl PageManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json_str(s: &str) -> OgResult<Self> {
        serde_json::from_str(s).map_err(|e| OgError::validation(format!("manifest: {e}")))
    }

    /// Read and parse a manifest file.
    pub fn from_path(path: &Path) -> OgResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Published pages (or every page when `include_drafts`) paired with their resolved slugs.
    ///
    /// Duplicate slugs are rejected since they would overwrite each other's output.
    pub fn routable(&self, include_drafts: bool) -> OgResult<Vec<(String, &PageMetadata)>> {
        let mut out = Vec::with_capacity(self.pages.len());
        let mut seen = std::collections::BTreeSet::new();
        for entry in &self.pages {
            if entry.draft && !include_drafts {
                continue;
            }
            let slug = entry.resolved_slug()?;
            if !seen.insert(slug.clone()) {
                return Err(OgError::validation(format!("duplicate slug '{slug}'")));
            }
            out.push((slug, &entry.meta));
        }
        Ok(out)
    }
}

/// URL slug for a title: lowercase, punctuation dropped, whitespace runs become `-`.
pub fn slug_from_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept: String = lowered
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(kept.len());
    let mut prev_dash = false;
    for c in kept.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' {
            if prev_dash {
                continue;
            }
            prev_dash = true;
        } else {
            prev_dash = false;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/page/manifest.rs"]
mod tests;
