use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("fonts/Inter.ttf").unwrap(), "fonts/Inter.ttf");
    assert_eq!(normalize_rel_path("fonts\\Inter.ttf").unwrap(), "fonts/Inter.ttf");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn normalize_path_rejects_escapes_with_the_offending_path() {
    let err = normalize_rel_path("fonts/../../secret.ttf").unwrap_err();
    assert!(matches!(err, OgError::Validation(_)));
    assert!(err.to_string().contains("fonts/../../secret.ttf"));

    assert!(normalize_rel_path("C:\\fonts\\Inter.ttf").is_err());
    assert!(normalize_rel_path("\\\\server\\share.png").is_err());
    assert_eq!(normalize_rel_path("  avatar.png ").unwrap(), "avatar.png");
}

#[test]
fn parses_font_sources() {
    let cfg = BrandingConfig::from_json_str(
        r#"{
          "avatar": "assets/avatar.png",
          "fonts": [
            { "family": "Inter", "weight": 400, "source": { "path": "fonts/Inter-Regular.ttf" } },
            { "family": "Inter", "weight": 900, "source": "google_fonts" }
          ]
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.fonts.len(), 2);
    assert_eq!(
        cfg.fonts[0].source,
        FontSource::Path("fonts/Inter-Regular.ttf".to_string())
    );
    assert_eq!(cfg.fonts[1].source, FontSource::GoogleFonts);
    assert!(cfg.card.is_none());
    assert_eq!(cfg.card_config(), CardConfig::default());
}

#[test]
fn embedded_card_config_is_validated() {
    let err = BrandingConfig::from_json_str(
        r#"{
          "avatar": "a.png",
          "fonts": [ { "family": "X", "weight": 400, "source": { "path": "x.ttf" } } ],
          "card": { "title": { "steps": [] } }
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, OgError::Validation(_)));
}

#[test]
fn empty_font_list_is_an_asset_error() {
    let err = BrandingConfig::from_json_str(r#"{ "avatar": "a.png", "fonts": [] }"#).unwrap_err();
    assert!(err.is_asset_error());
}

#[test]
fn missing_branding_file_is_an_asset_error() {
    let err = BrandingConfig::from_path(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.is_asset_error());
    assert!(err.to_string().contains("exist.json"));
}
