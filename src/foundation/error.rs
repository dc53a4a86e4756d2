/// Convenience result type used across ogcard.
pub type OgResult<T> = Result<T, OgError>;

/// Pipeline stage a render error originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStage {
    /// Flexbox layout and text measurement.
    Layout,
    /// Parsing the composed SVG document into a vector tree.
    Svg,
    /// Rasterizing the vector tree into pixels.
    Raster,
    /// PNG encoding of the final pixels.
    Encode,
}

impl std::fmt::Display for RenderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Layout => "layout",
            Self::Svg => "svg",
            Self::Raster => "raster",
            Self::Encode => "encode",
        })
    }
}

/// Top-level error taxonomy used by renderer and asset APIs.
#[derive(thiserror::Error, Debug)]
pub enum OgError {
    /// Invalid configuration or metadata.
    #[error("validation error: {0}")]
    Validation(String),

    /// A branding asset could not be read or parsed at load time.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// A font face required by the card layout is not part of the branding assets.
    #[error("missing font face: family '{family}' weight {weight}")]
    MissingFont {
        /// Requested family name.
        family: String,
        /// Requested CSS weight.
        weight: u16,
    },

    /// Avatar bytes could not be decoded during a render call.
    #[error("avatar error: {0}")]
    Avatar(String),

    /// Layout-to-raster conversion failed for a single render call.
    #[error("render error ({stage}): {message}")]
    Render {
        /// Stage that failed.
        stage: RenderStage,
        /// Human-readable cause.
        message: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OgError {
    /// Build an [`OgError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OgError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build an [`OgError::Avatar`] value.
    pub fn avatar(msg: impl Into<String>) -> Self {
        Self::Avatar(msg.into())
    }

    /// Build an [`OgError::Render`] value for `stage`.
    pub fn render(stage: RenderStage, msg: impl Into<String>) -> Self {
        Self::Render {
            stage,
            message: msg.into(),
        }
    }

    /// Return `true` for startup-time asset failures.
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Self::AssetLoad(_))
    }

    /// Return `true` for failures scoped to a single render call.
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFont { .. } | Self::Avatar(_) | Self::Render { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
