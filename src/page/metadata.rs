use serde::{Deserialize, Serialize};

use crate::foundation::fingerprint::{Fingerprint, StableHasher};

fn default_true() -> bool {
    true
}

/// Per-page input to the renderer.
///
/// Never carries binary data; avatar and fonts come from [`crate::BrandingAssets`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Headline text. May be empty, in which case the description becomes the headline.
    #[serde(default)]
    pub title: String,
    /// Supporting text. May be empty.
    #[serde(default)]
    pub description: String,
    /// Section label shown in the header badge (e.g. `Writing`, `Home`).
    #[serde(alias = "breadcrumb_label")]
    pub breadcrumb: String,
    /// When `false` the description is never drawn, whatever its value.
    #[serde(default = "default_true")]
    pub show_description: bool,
}

impl PageMetadata {
    /// Metadata with a title and breadcrumb, no description, description visible.
    pub fn new(title: impl Into<String>, breadcrumb: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            breadcrumb: breadcrumb.into(),
            show_description: true,
        }
    }

    /// Replace the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set description visibility.
    pub fn with_show_description(mut self, show: bool) -> Self {
        self.show_description = show;
        self
    }

    /// Description text that will actually be drawn, if any.
    pub fn visible_description(&self) -> Option<&str> {
        if self.show_description && !self.description.trim().is_empty() {
            Some(self.description.as_str())
        } else {
            None
        }
    }

    /// `true` when there is no title and the description takes the headline slot.
    pub fn description_is_headline(&self) -> bool {
        self.title.trim().is_empty() && self.visible_description().is_some()
    }

    /// Stable fingerprint of the record, usable as a render cache key.
    ///
    /// Fields that cannot affect the output (a hidden description) are excluded, so records that
    /// render identically share a fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut h = StableHasher::new();
        h.write_str(&self.title);
        h.write_str(&self.breadcrumb);
        match self.visible_description() {
            Some(d) => {
                h.write_bool(true);
                h.write_str(d);
            }
            None => h.write_bool(false),
        }
        h.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/metadata.rs"]
mod tests;
