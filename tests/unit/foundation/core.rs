use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#171717")).unwrap();
    assert_eq!(c, Rgba8::rgb(0x17, 0x17, 0x17));

    let c: Rgba8 = serde_json::from_value(json!("E5E5E580")).unwrap();
    assert_eq!(
        c,
        Rgba8 {
            r: 0xe5,
            g: 0xe5,
            b: 0xe5,
            a: 0x80
        }
    );
}

#[test]
fn rejects_malformed_hex() {
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
    assert!(Rgba8::parse_hex("#ééé").is_err());
    assert!(serde_json::from_value::<Rgba8>(json!("red")).is_err());
}

#[test]
fn serializes_back_to_hex() {
    assert_eq!(
        serde_json::to_value(Rgba8::rgb(255, 0, 16)).unwrap(),
        json!("#ff0010")
    );
    let translucent = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0x40,
    };
    assert_eq!(
        serde_json::to_value(translucent).unwrap(),
        json!("#00000040")
    );
    assert!((translucent.opacity() - 64.0 / 255.0).abs() < 1e-6);
}

#[test]
fn og_canvas_is_fixed() {
    assert_eq!(Canvas::OG.width, 1200);
    assert_eq!(Canvas::OG.height, 630);
}
