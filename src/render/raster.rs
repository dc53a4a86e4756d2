use std::io::Cursor;

use crate::foundation::core::Canvas;
use crate::foundation::error::{OgError, OgResult, RenderStage};

/// Parse an SVG document with the given options.
pub(crate) fn parse_svg(svg: &str, opts: &usvg::Options<'_>) -> OgResult<usvg::Tree> {
    usvg::Tree::from_str(svg, opts)
        .map_err(|e| OgError::render(RenderStage::Svg, format!("parse svg: {e}")))
}

/// Rasterize `tree` to `canvas.width` pixels wide, keeping the document's aspect ratio.
///
/// Returns straight (non-premultiplied) RGBA8 rows.
pub(crate) fn rasterize_to_width(tree: &usvg::Tree, canvas: Canvas) -> OgResult<Vec<u8>> {
    let size = tree.size();
    if !(size.width() > 0.0 && size.height() > 0.0) {
        return Err(OgError::render(
            RenderStage::Raster,
            "svg has invalid width/height",
        ));
    }
    let scale = canvas.width as f32 / size.width();
    let height = (size.height() * scale).round() as u32;
    if height != canvas.height {
        return Err(OgError::render(
            RenderStage::Raster,
            format!(
                "svg aspect ratio gives {}x{height}, expected {}x{}",
                canvas.width, canvas.width, canvas.height
            ),
        ));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| OgError::render(RenderStage::Raster, "failed to allocate pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied pixels; PNG wants straight alpha.
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(rgba)
}

/// Encode straight RGBA8 pixels as PNG.
pub(crate) fn encode_png(rgba: Vec<u8>, canvas: Canvas) -> OgResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, rgba).ok_or_else(|| {
        OgError::render(RenderStage::Encode, "pixel buffer does not match canvas size")
    })?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| OgError::render(RenderStage::Encode, format!("encode png: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
