use super::*;
use crate::assets::store::FontFace;

fn assets() -> BrandingAssets {
    let regular = std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap();
    let bold = std::fs::read("tests/data/fonts/DejaVuSans-Bold.ttf").unwrap();
    BrandingAssets::from_parts_unchecked(
        vec![],
        vec![
            FontFace::new("DejaVu Sans", 400, regular),
            FontFace::new("DejaVu Sans", 700, bold),
        ],
    )
    .unwrap()
}

fn block(text: &str, weight: u16, size_px: f32) -> TextBlock {
    TextBlock {
        text: text.to_string(),
        weight,
        size_px,
        line_height: 1.3,
        letter_spacing_px: 0.0,
        color: Rgba8::rgb(0, 0, 0),
        anchor: TextAnchor::Start,
    }
}

#[test]
fn missing_weight_is_reported_as_missing_font() {
    let err = TextMeasurer::new(&assets(), "DejaVu Sans", &[400, 900])
        .err()
        .unwrap();
    match err {
        OgError::MissingFont { family, weight } => {
            assert_eq!(family, "DejaVu Sans");
            assert_eq!(weight, 900);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_line_without_width_limit() {
    let mut m = TextMeasurer::new(&assets(), "DejaVu Sans", &[400]).unwrap();
    let shaped = m.shape(&block("Writing", 400, 28.0), None).unwrap();
    assert_eq!(shaped.lines.len(), 1);
    assert_eq!(shaped.lines[0].text, "Writing");
    assert!(shaped.width > 28.0);
    assert!((shaped.height - 28.0 * 1.3).abs() < 1e-3);

    let baseline = shaped.lines[0].baseline;
    assert!(baseline > 0.0 && baseline < shaped.height);
}

#[test]
fn wraps_to_width_and_keeps_every_word() {
    let mut m = TextMeasurer::new(&assets(), "DejaVu Sans", &[700]).unwrap();
    let text = "Why I keep starting blogs and why this time it might actually stick";
    let shaped = m.shape(&block(text, 700, 64.0), Some(600.0)).unwrap();

    assert!(shaped.lines.len() > 1);
    // Trailing whitespace may hang past the limit.
    assert!(shaped.width <= 600.0 + 64.0);
    assert!((shaped.height - 64.0 * 1.3 * shaped.lines.len() as f32).abs() < 1e-2);

    let rejoined: Vec<&str> = shaped.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(rejoined.join(" "), text);

    for pair in shaped.lines.windows(2) {
        assert!((pair[1].baseline - pair[0].baseline - 64.0 * 1.3).abs() < 1e-2);
    }
}

#[test]
fn bigger_size_measures_wider() {
    let mut m = TextMeasurer::new(&assets(), "dejavu sans", &[400]).unwrap();
    let small = m.shape(&block("Stack", 400, 20.0), None).unwrap();
    let large = m.shape(&block("Stack", 400, 80.0), None).unwrap();
    assert!(large.width > small.width * 3.0);
}

#[test]
fn empty_text_has_no_lines() {
    let mut m = TextMeasurer::new(&assets(), "DejaVu Sans", &[400]).unwrap();
    let shaped = m.shape(&block("", 400, 20.0), Some(100.0)).unwrap();
    assert!(shaped.lines.is_empty());
    assert_eq!(shaped.height, 0.0);
}

#[test]
fn measurer_shares_font_bytes_with_assets() {
    let assets = assets();
    let face = assets.face("DejaVu Sans", 700).unwrap();
    let before = std::sync::Arc::strong_count(&face.data);

    let _m = TextMeasurer::new(&assets, "DejaVu Sans", &[700]).unwrap();
    assert!(std::sync::Arc::strong_count(&face.data) > before);
}
