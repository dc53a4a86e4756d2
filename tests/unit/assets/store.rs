use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 120, 40, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn dejavu() -> Vec<u8> {
    std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap()
}

fn tmp_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ogcard_store_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn probe_avatar_reports_mime_and_size() {
    let info = probe_avatar(&png_bytes(3, 2)).unwrap();
    assert_eq!(info.mime, "image/png");
    assert_eq!((info.width, info.height), (3, 2));

    assert!(probe_avatar(&[]).is_err());
    assert!(probe_avatar(b"definitely not an image").is_err());
}

#[test]
fn new_validates_avatar_and_fonts() {
    let assets =
        BrandingAssets::new(png_bytes(4, 4), vec![FontFace::new("DejaVu Sans", 400, dejavu())])
            .unwrap();
    assert_eq!(assets.faces().len(), 1);
    assert!(assets.face("dejavu sans", 400).is_some());
    assert!(assets.face("DejaVu Sans", 700).is_none());

    let err = BrandingAssets::new(b"junk".to_vec(), vec![FontFace::new("X", 400, dejavu())])
        .unwrap_err();
    assert!(err.is_asset_error());

    let err = BrandingAssets::new(png_bytes(1, 1), vec![FontFace::new("X", 400, vec![1, 2, 3])])
        .unwrap_err();
    assert!(err.is_asset_error());

    let err = BrandingAssets::new(png_bytes(1, 1), vec![]).unwrap_err();
    assert!(err.is_asset_error());
}

#[test]
fn unchecked_defers_avatar_errors() {
    let assets =
        BrandingAssets::from_parts_unchecked(b"junk".to_vec(), vec![FontFace::new("X", 400, dejavu())])
            .unwrap();
    assert!(assets.avatar_info().is_err());
    assert_eq!(assets.avatar_bytes(), b"junk");
}

#[test]
fn load_reads_files_relative_to_root() {
    let dir = tmp_dir("load");
    std::fs::create_dir_all(dir.join("fonts")).unwrap();
    std::fs::write(dir.join("avatar.png"), png_bytes(8, 8)).unwrap();
    std::fs::write(dir.join("fonts/regular.ttf"), dejavu()).unwrap();
    std::fs::copy(
        "tests/data/fonts/DejaVuSans-Bold.ttf",
        dir.join("fonts/bold.ttf"),
    )
    .unwrap();

    let cfg = BrandingConfig::from_json_str(
        r#"{
          "avatar": "avatar.png",
          "fonts": [
            { "family": "Brand", "weight": 400, "source": { "path": "fonts/regular.ttf" } },
            { "family": "Brand", "weight": 700, "source": { "path": "./fonts/bold.ttf" } }
          ]
        }"#,
    )
    .unwrap();

    let assets = BrandingAssets::load(&cfg, &dir).unwrap();
    let weights: Vec<u16> = assets.faces().iter().map(|f| f.weight).collect();
    assert_eq!(weights, [400, 700]);
    assert_eq!(assets.avatar_info().unwrap().width, 8);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn load_fails_on_missing_font_file() {
    let dir = tmp_dir("missing");
    std::fs::write(dir.join("avatar.png"), png_bytes(2, 2)).unwrap();

    let cfg = BrandingConfig::from_json_str(
        r#"{
          "avatar": "avatar.png",
          "fonts": [ { "family": "Brand", "weight": 400, "source": { "path": "nope.ttf" } } ]
        }"#,
    )
    .unwrap();

    let err = BrandingAssets::load(&cfg, &dir).unwrap_err();
    assert!(err.is_asset_error());
    assert!(err.to_string().contains("nope.ttf"));

    std::fs::remove_dir_all(&dir).ok();
}

#[cfg(not(feature = "remote-fonts"))]
#[test]
fn google_fonts_source_requires_feature() {
    let def = FontDef {
        family: "Inter".to_string(),
        weight: 900,
        source: FontSource::GoogleFonts,
    };
    let err = load_face(&def, Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("remote-fonts"));
}

#[test]
fn assets_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BrandingAssets>();
}
