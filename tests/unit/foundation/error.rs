use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OgError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        OgError::asset_load("x")
            .to_string()
            .contains("asset load error:")
    );
    assert!(OgError::avatar("x").to_string().contains("avatar error:"));
    assert_eq!(
        OgError::render(RenderStage::Raster, "boom").to_string(),
        "render error (raster): boom"
    );
}

#[test]
fn missing_font_names_family_and_weight() {
    let err = OgError::MissingFont {
        family: "Inter".to_string(),
        weight: 900,
    };
    let msg = err.to_string();
    assert!(msg.contains("Inter"));
    assert!(msg.contains("900"));
}

#[test]
fn classification_separates_startup_from_per_call() {
    assert!(OgError::asset_load("x").is_asset_error());
    assert!(!OgError::asset_load("x").is_render_error());

    assert!(OgError::avatar("x").is_render_error());
    assert!(OgError::render(RenderStage::Layout, "x").is_render_error());
    assert!(
        OgError::MissingFont {
            family: "a".into(),
            weight: 400
        }
        .is_render_error()
    );
    assert!(!OgError::validation("x").is_render_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OgError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
