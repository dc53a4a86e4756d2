use std::fmt::Write as _;

use base64::Engine as _;

use crate::card::layout::{Decoration, LaidOut, LaidOutItem, RectPx};
use crate::card::text::TextAnchor;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{OgError, OgResult, RenderStage};

/// Avatar image as it is embedded into the document.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AvatarEmbed<'a> {
    pub(crate) mime: &'static str,
    pub(crate) bytes: &'a [u8],
}

/// Serialize a laid-out card as a standalone SVG document.
///
/// Output depends only on the inputs: element ids are allocated in tree order and every number is
/// printed with fixed precision.
pub(crate) fn write_card_svg(
    root: &LaidOut,
    avatar: AvatarEmbed<'_>,
    font_family: &str,
) -> OgResult<String> {
    let mut w = SvgWriter {
        out: String::with_capacity(4096 + avatar.bytes.len() * 4 / 3),
        next_id: 0,
        avatar_href: format!(
            "data:{};base64,{}",
            avatar.mime,
            base64::engine::general_purpose::STANDARD.encode(avatar.bytes)
        ),
        family: css_family(font_family),
    };
    w.document(root)
        .map_err(|e| OgError::render(RenderStage::Svg, format!("write svg: {e}")))?;
    Ok(w.out)
}

struct SvgWriter {
    out: String,
    next_id: u32,
    avatar_href: String,
    family: String,
}

impl SvgWriter {
    fn document(&mut self, root: &LaidOut) -> std::fmt::Result {
        let canvas = Canvas::OG;
        write!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = canvas.width,
            h = canvas.height,
        )?;
        self.node(root)?;
        self.out.push_str("</svg>");
        Ok(())
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn node(&mut self, node: &LaidOut) -> std::fmt::Result {
        match &node.item {
            LaidOutItem::Box(deco) => self.boxed(node, deco),
            LaidOutItem::Avatar => self.avatar(node.rect),
            LaidOutItem::Text { block, shaped } => {
                let (x, anchor) = match block.anchor {
                    TextAnchor::Start => (node.rect.x, None),
                    TextAnchor::End => (node.rect.x + node.rect.w, Some("end")),
                };
                for line in &shaped.lines {
                    write!(
                        self.out,
                        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}""#,
                        num(x),
                        num(node.rect.y + line.baseline),
                        self.family,
                        num(block.size_px),
                        block.weight,
                    )?;
                    if block.letter_spacing_px != 0.0 {
                        write!(self.out, r#" letter-spacing="{}""#, num(block.letter_spacing_px))?;
                    }
                    if let Some(anchor) = anchor {
                        write!(self.out, r#" text-anchor="{anchor}""#)?;
                    }
                    self.paint("fill", block.color)?;
                    write!(self.out, ">{}</text>", escape(&line.text))?;
                }
                Ok(())
            }
        }
    }

    fn boxed(&mut self, node: &LaidOut, deco: &Decoration) -> std::fmt::Result {
        let r = node.rect;
        let radius = clamp_radius(deco.radius, r);

        if let Some(fill) = deco.fill {
            self.rect(r, radius)?;
            self.paint("fill", fill)?;
            self.out.push_str("/>");
        }

        let clip_id = if deco.clip && !node.children.is_empty() {
            let id = self.fresh_id("clip");
            write!(self.out, r#"<clipPath id="{id}">"#)?;
            self.rect(r, radius)?;
            self.out.push_str("/></clipPath>");
            write!(self.out, r##"<g clip-path="url(#{id})">"##)?;
            Some(id)
        } else {
            None
        };
        for child in &node.children {
            self.node(child)?;
        }
        if clip_id.is_some() {
            self.out.push_str("</g>");
        }

        if let Some(c) = deco.rule_top {
            self.rule(r.x, r.y, r.w, c)?;
        }
        if let Some(c) = deco.rule_bottom {
            self.rule(r.x, r.y + r.h - 1.0, r.w, c)?;
        }
        // Stroke last so it sits above clipped content; inset half a pixel to stay inside.
        if let Some(stroke) = deco.stroke {
            let inset = RectPx {
                x: r.x + 0.5,
                y: r.y + 0.5,
                w: (r.w - 1.0).max(0.0),
                h: (r.h - 1.0).max(0.0),
            };
            self.rect(inset, clamp_radius(deco.radius, inset))?;
            self.out.push_str(r#" fill="none" stroke-width="1""#);
            self.paint("stroke", stroke)?;
            self.out.push_str("/>");
        }
        Ok(())
    }

    fn avatar(&mut self, r: RectPx) -> std::fmt::Result {
        let id = self.fresh_id("avatar");
        let radius = r.w.min(r.h) / 2.0;
        write!(
            self.out,
            r#"<clipPath id="{id}"><circle cx="{}" cy="{}" r="{}"/></clipPath>"#,
            num(r.x + r.w / 2.0),
            num(r.y + r.h / 2.0),
            num(radius),
        )?;
        write!(
            self.out,
            r##"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#{id})" xlink:href="{}"/>"##,
            num(r.x),
            num(r.y),
            num(r.w),
            num(r.h),
            self.avatar_href,
        )
    }

    /// Open a `<rect` element; the caller adds paint and closes it.
    fn rect(&mut self, r: RectPx, radius: f32) -> std::fmt::Result {
        write!(
            self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            num(r.x),
            num(r.y),
            num(r.w),
            num(r.h),
        )?;
        if radius > 0.0 {
            write!(self.out, r#" rx="{}""#, num(radius))?;
        }
        Ok(())
    }

    fn rule(&mut self, x: f32, y: f32, w: f32, color: Rgba8) -> std::fmt::Result {
        self.rect(RectPx { x, y, w, h: 1.0 }, 0.0)?;
        self.paint("fill", color)?;
        self.out.push_str("/>");
        Ok(())
    }

    fn paint(&mut self, attr: &str, color: Rgba8) -> std::fmt::Result {
        write!(self.out, r#" {attr}="{}""#, color.to_hex_rgb())?;
        if color.a != 255 {
            write!(self.out, r#" {attr}-opacity="{}""#, num(color.opacity()))?;
        }
        Ok(())
    }
}

fn clamp_radius(radius: f32, r: RectPx) -> f32 {
    let max = r.w.min(r.h) / 2.0;
    if radius.is_nan() || radius <= 0.0 || max <= 0.0 {
        0.0
    } else {
        radius.min(max)
    }
}

/// Fixed-precision number without trailing zeros.
fn num(v: f32) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn css_family(family: &str) -> String {
    let cleaned: String = family
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '\\'))
        .collect();
    format!("'{}'", escape(cleaned.trim()))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if !is_xml_char(c) || (c.is_control() && !matches!(c, '\t' | '\n')) => {}
            c => out.push(c),
        }
    }
    out
}

/// The XML 1.0 `Char` production; anything else makes the document unparseable.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
#[path = "../../tests/unit/card/svg.rs"]
mod tests;
