use super::*;

#[test]
fn default_config_is_valid() {
    CardConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = CardConfig::from_json_str(
        r##"{
          "palette": { "foreground": "#0a0a0a" },
          "typography": { "family": "DejaVu Sans", "title_weight": 700 },
          "site_label": "example.org"
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.palette.foreground, Rgba8::rgb(0x0a, 0x0a, 0x0a));
    assert_eq!(cfg.palette.border, Palette::default().border);
    assert_eq!(cfg.typography.family, "DejaVu Sans");
    assert_eq!(cfg.typography.title_weight, 700);
    assert_eq!(cfg.typography.description_weight, 400);
    assert_eq!(cfg.site_label, "example.org");
    assert_eq!(cfg.title, TitleScale::default());
}

#[test]
fn rejects_non_monotonic_steps() {
    let mut cfg = CardConfig::default();
    cfg.title.steps[1].size_px = 200.0;
    assert!(cfg.validate().is_err());

    let mut cfg = CardConfig::default();
    cfg.title.steps[2].max_chars = 10;
    assert!(cfg.validate().is_err());

    let mut cfg = CardConfig::default();
    cfg.title.floor_px = 100.0;
    assert!(cfg.validate().is_err());

    let mut cfg = CardConfig::default();
    cfg.title.steps.clear();
    assert!(cfg.validate().is_err());

    let mut cfg = CardConfig::default();
    cfg.title.line_heights.reverse();
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_unusable_sizes_and_weights() {
    let mut cfg = CardConfig::default();
    cfg.badge.size_px = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = CardConfig::default();
    cfg.description.line_height = f32::NAN;
    assert!(cfg.validate().is_err());

    let mut cfg = CardConfig::default();
    cfg.typography.brand_weight = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = CardConfig::default();
    cfg.typography.family = "  ".to_string();
    assert!(cfg.validate().is_err());
}

#[test]
fn bad_color_is_reported_as_validation() {
    let err = CardConfig::from_json_str(r##"{ "palette": { "border": "#12" } }"##).unwrap_err();
    assert!(matches!(err, OgError::Validation(_)));
}
