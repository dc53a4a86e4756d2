//! Process-wide branding assets.
//!
//! Lifecycle: [`install`] is called once during startup, after [`crate::BrandingAssets::load`]
//! succeeds and before any render is served. From then on the assets are read-only for the life of
//! the process; there is no way to replace or mutate them. Request handlers call [`get`] or
//! [`installed`] and pass the reference to the renderer.

use std::sync::OnceLock;

use crate::assets::store::BrandingAssets;
use crate::foundation::error::{OgError, OgResult};

static ASSETS: OnceLock<BrandingAssets> = OnceLock::new();

/// Install the process-wide assets. Fails if assets were already installed.
pub fn install(assets: BrandingAssets) -> OgResult<&'static BrandingAssets> {
    ASSETS
        .set(assets)
        .map_err(|_| OgError::asset_load("branding assets are already installed"))?;
    tracing::debug!("branding assets installed");
    installed()
}

/// The installed assets, if any.
pub fn get() -> Option<&'static BrandingAssets> {
    ASSETS.get()
}

/// The installed assets, or an error when startup has not installed them.
pub fn installed() -> OgResult<&'static BrandingAssets> {
    ASSETS
        .get()
        .ok_or_else(|| OgError::asset_load("branding assets have not been installed"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/global.rs"]
mod tests;
