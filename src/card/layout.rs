use taffy::prelude::{AvailableSpace, NodeId, Rect, Size};
use taffy::style::{
    AlignItems, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage, Style,
};

use crate::card::config::{CardConfig, TextStyle};
use crate::card::text::{ShapedText, TextAnchor, TextBlock, TextMeasurer};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{OgError, OgResult, RenderStage};
use crate::page::metadata::PageMetadata;

const FRAME_PADDING: f32 = 40.0;
const CARD_RADIUS: f32 = 24.0;
const HAIRLINE: f32 = 1.0;
const ROW_PADDING_X: f32 = 48.0;
const HEADER_HEIGHT: f32 = 112.0;
const HEADER_GAP: f32 = 24.0;
const AVATAR_SIZE: f32 = 64.0;
const BADGE_PADDING_X: f32 = 20.0;
const BADGE_PADDING_Y: f32 = 8.0;
const CONTENT_PADDING_Y: f32 = 40.0;
const CONTENT_GAP: f32 = 24.0;
const FOOTER_HEIGHT: f32 = 56.0;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RectPx {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) w: f32,
    pub(crate) h: f32,
}

/// Paint applied to a box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Decoration {
    pub(crate) fill: Option<Rgba8>,
    pub(crate) stroke: Option<Rgba8>,
    /// Corner radius; clamped to half the shorter side when painted.
    pub(crate) radius: f32,
    pub(crate) rule_top: Option<Rgba8>,
    pub(crate) rule_bottom: Option<Rgba8>,
    /// Clip descendants to this box.
    pub(crate) clip: bool,
}

/// What a text element is on the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TextRole {
    Brand,
    Badge,
    Title,
    Description,
    /// Description promoted to the headline slot.
    Headline,
    Footer,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NodeKind {
    Box(Decoration),
    Text(TextRole, TextBlock),
    Avatar,
}

#[derive(Clone, Debug)]
struct CardNode {
    kind: NodeKind,
    style: Style,
    children: Vec<usize>,
}

/// Declarative card tree for one page, before measurement.
#[derive(Clone, Debug)]
pub(crate) struct CardTree {
    nodes: Vec<CardNode>,
    root: usize,
}

/// A node after layout, with absolute geometry and broken text lines.
#[derive(Clone, Debug)]
pub(crate) struct LaidOut {
    pub(crate) rect: RectPx,
    pub(crate) item: LaidOutItem,
    pub(crate) children: Vec<LaidOut>,
}

#[derive(Clone, Debug)]
pub(crate) enum LaidOutItem {
    Box(Decoration),
    Text { block: TextBlock, shaped: ShapedText },
    Avatar,
}

#[derive(Debug, Clone, Copy)]
struct LayoutNodeCtx {
    node: usize,
}

fn px(v: f32) -> LengthPercentage {
    LengthPercentage::length(v)
}

fn padding(y: f32, x: f32) -> Rect<LengthPercentage> {
    Rect {
        left: px(x),
        right: px(x),
        top: px(y),
        bottom: px(y),
    }
}

fn fixed(w: Dimension, h: Dimension) -> Size<Dimension> {
    Size {
        width: w,
        height: h,
    }
}

fn row(height: f32) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        align_items: Some(AlignItems::Center),
        size: fixed(Dimension::auto(), Dimension::length(height)),
        flex_shrink: 0.0,
        padding: padding(0.0, ROW_PADDING_X),
        ..Style::default()
    }
}

fn text_leaf() -> Style {
    Style {
        flex_shrink: 0.0,
        ..Style::default()
    }
}

impl CardTree {
    fn push(&mut self, kind: NodeKind, style: Style, children: Vec<usize>) -> usize {
        self.nodes.push(CardNode {
            kind,
            style,
            children,
        });
        self.nodes.len() - 1
    }

    /// Build the three-row card for `meta`.
    pub(crate) fn compose(meta: &PageMetadata, config: &CardConfig) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: 0,
        };
        let pal = &config.palette;
        let ty = &config.typography;
        let block = |text: &str, weight: u16, style: TextStyle, color: Rgba8| TextBlock {
            text: text.to_string(),
            weight,
            size_px: style.size_px,
            line_height: style.line_height,
            letter_spacing_px: 0.0,
            color,
            anchor: TextAnchor::Start,
        };

        // Header: avatar, brand name, flexible gap, badge.
        let avatar = tree.push(
            NodeKind::Avatar,
            Style {
                size: fixed(
                    Dimension::length(AVATAR_SIZE),
                    Dimension::length(AVATAR_SIZE),
                ),
                flex_shrink: 0.0,
                ..Style::default()
            },
            vec![],
        );
        let brand = tree.push(
            NodeKind::Text(
                TextRole::Brand,
                block(
                    &config.brand_name,
                    ty.brand_weight,
                    config.brand,
                    pal.muted_foreground,
                ),
            ),
            text_leaf(),
            vec![],
        );
        let spacer = tree.push(
            NodeKind::Box(Decoration::default()),
            Style {
                flex_grow: 1.0,
                ..Style::default()
            },
            vec![],
        );
        let mut header_children = vec![avatar, brand, spacer];
        let breadcrumb = meta.breadcrumb.trim();
        if !breadcrumb.is_empty() {
            let badge_text = tree.push(
                NodeKind::Text(
                    TextRole::Badge,
                    block(
                        breadcrumb,
                        ty.badge_weight,
                        config.badge,
                        pal.muted_foreground,
                    ),
                ),
                text_leaf(),
                vec![],
            );
            let badge = tree.push(
                NodeKind::Box(Decoration {
                    fill: Some(pal.secondary),
                    stroke: Some(pal.border),
                    radius: f32::INFINITY,
                    ..Decoration::default()
                }),
                Style {
                    display: Display::Flex,
                    align_items: Some(AlignItems::Center),
                    flex_shrink: 0.0,
                    padding: padding(BADGE_PADDING_Y, BADGE_PADDING_X),
                    ..Style::default()
                },
                vec![badge_text],
            );
            header_children.push(badge);
        }
        let header = tree.push(
            NodeKind::Box(Decoration {
                rule_bottom: Some(pal.border),
                ..Decoration::default()
            }),
            Style {
                gap: Size {
                    width: px(HEADER_GAP),
                    height: px(0.0),
                },
                ..row(HEADER_HEIGHT)
            },
            header_children,
        );

        // Content: title and/or description, vertically centered.
        let mut content_children = Vec::new();
        let title = meta.title.trim();
        if !title.is_empty() {
            let size_px = config.title.font_size_for(title);
            let style = TextStyle {
                size_px,
                line_height: config.title.line_height_for(size_px),
            };
            let mut b = block(title, ty.title_weight, style, pal.foreground);
            b.letter_spacing_px = config.title.letter_spacing_em * size_px;
            content_children.push(tree.push(
                NodeKind::Text(TextRole::Title, b),
                text_leaf(),
                vec![],
            ));
        }
        if let Some(desc) = meta.visible_description() {
            let desc = desc.trim();
            let kind = if meta.description_is_headline() {
                NodeKind::Text(
                    TextRole::Headline,
                    block(desc, ty.headline_weight, config.headline, pal.foreground),
                )
            } else {
                NodeKind::Text(
                    TextRole::Description,
                    block(
                        desc,
                        ty.description_weight,
                        config.description,
                        pal.muted_foreground,
                    ),
                )
            };
            content_children.push(tree.push(kind, text_leaf(), vec![]));
        }
        let content = tree.push(
            NodeKind::Box(Decoration {
                clip: true,
                ..Decoration::default()
            }),
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                justify_content: Some(JustifyContent::Center),
                flex_grow: 1.0,
                flex_shrink: 1.0,
                min_size: fixed(Dimension::auto(), Dimension::length(0.0)),
                padding: padding(CONTENT_PADDING_Y, ROW_PADDING_X),
                gap: Size {
                    width: px(0.0),
                    height: px(CONTENT_GAP),
                },
                ..Style::default()
            },
            content_children,
        );

        // Footer: site label on the right.
        let mut footer_children = Vec::new();
        if !config.site_label.trim().is_empty() {
            let mut b = block(
                config.site_label.trim(),
                ty.footer_weight,
                config.footer,
                pal.muted_foreground,
            );
            b.anchor = TextAnchor::End;
            footer_children.push(tree.push(NodeKind::Text(TextRole::Footer, b), text_leaf(), vec![]));
        }
        let footer = tree.push(
            NodeKind::Box(Decoration {
                rule_top: Some(pal.border),
                ..Decoration::default()
            }),
            Style {
                justify_content: Some(JustifyContent::FlexEnd),
                ..row(FOOTER_HEIGHT)
            },
            footer_children,
        );

        let card = tree.push(
            NodeKind::Box(Decoration {
                fill: Some(pal.background),
                stroke: Some(pal.border),
                radius: CARD_RADIUS,
                clip: true,
                ..Decoration::default()
            }),
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                flex_grow: 1.0,
                border: padding(HAIRLINE, HAIRLINE),
                ..Style::default()
            },
            vec![header, content, footer],
        );

        let canvas = Canvas::OG;
        tree.root = tree.push(
            NodeKind::Box(Decoration {
                fill: Some(pal.secondary),
                ..Decoration::default()
            }),
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                size: fixed(
                    Dimension::length(canvas.width as f32),
                    Dimension::length(canvas.height as f32),
                ),
                padding: padding(FRAME_PADDING, FRAME_PADDING),
                ..Style::default()
            },
            vec![card],
        );
        tree
    }

    /// Text elements in paint order.
    pub(crate) fn texts(&self) -> Vec<(TextRole, &TextBlock)> {
        let mut out = Vec::new();
        self.collect_texts(self.root, &mut out);
        out
    }

    fn collect_texts<'a>(&'a self, idx: usize, out: &mut Vec<(TextRole, &'a TextBlock)>) {
        let node = &self.nodes[idx];
        if let NodeKind::Text(role, block) = &node.kind {
            out.push((*role, block));
        }
        for &c in &node.children {
            self.collect_texts(c, out);
        }
    }

    /// Distinct font weights needed to draw every non-empty text element.
    pub(crate) fn required_weights(&self) -> Vec<u16> {
        let mut weights: Vec<u16> = self
            .texts()
            .into_iter()
            .filter(|(_, b)| !b.text.is_empty())
            .map(|(_, b)| b.weight)
            .collect();
        weights.sort_unstable();
        weights.dedup();
        weights
    }

    /// Run flexbox layout, measuring text with `measurer`.
    pub(crate) fn layout(&self, measurer: &mut TextMeasurer) -> OgResult<LaidOut> {
        let layout_err = |e: taffy::TaffyError| OgError::render(RenderStage::Layout, e.to_string());

        let mut taffy = taffy::TaffyTree::<LayoutNodeCtx>::new();
        let mut ids = vec![None::<NodeId>; self.nodes.len()];
        let root = self.build_taffy(&mut taffy, &mut ids, self.root).map_err(layout_err)?;

        let canvas = Canvas::OG;
        let available = Size {
            width: AvailableSpace::Definite(canvas.width as f32),
            height: AvailableSpace::Definite(canvas.height as f32),
        };

        let mut measure_err: Option<OgError> = None;
        taffy
            .compute_layout_with_measure(
                root,
                available,
                |known_dimensions, available_space, _node_id, node_context, _style| {
                    let Some(ctx) = node_context else {
                        return known_dimensions.unwrap_or(Size::ZERO);
                    };
                    let NodeKind::Text(_, block) = &self.nodes[ctx.node].kind else {
                        return known_dimensions.unwrap_or(Size::ZERO);
                    };
                    let max_width = known_dimensions.width.or(match available_space.width {
                        AvailableSpace::Definite(w) => Some(w),
                        AvailableSpace::MinContent => Some(0.0),
                        AvailableSpace::MaxContent => None,
                    });
                    match measurer.shape(block, max_width) {
                        Ok(shaped) => Size {
                            width: known_dimensions.width.unwrap_or(shaped.width),
                            height: known_dimensions.height.unwrap_or(shaped.height),
                        },
                        Err(e) => {
                            measure_err.get_or_insert(e);
                            Size::ZERO
                        }
                    }
                },
            )
            .map_err(layout_err)?;
        if let Some(e) = measure_err {
            return Err(e);
        }

        self.collect(&taffy, &ids, self.root, (0.0, 0.0), measurer)
    }

    fn build_taffy(
        &self,
        taffy: &mut taffy::TaffyTree<LayoutNodeCtx>,
        ids: &mut [Option<NodeId>],
        idx: usize,
    ) -> Result<NodeId, taffy::TaffyError> {
        let node = &self.nodes[idx];
        let children = node
            .children
            .iter()
            .map(|&c| self.build_taffy(taffy, ids, c))
            .collect::<Result<Vec<_>, _>>()?;

        let nid = match node.kind {
            NodeKind::Text(..) => {
                taffy.new_leaf_with_context(node.style.clone(), LayoutNodeCtx { node: idx })?
            }
            _ if children.is_empty() => taffy.new_leaf(node.style.clone())?,
            _ => taffy.new_with_children(node.style.clone(), &children)?,
        };
        ids[idx] = Some(nid);
        Ok(nid)
    }

    fn collect(
        &self,
        taffy: &taffy::TaffyTree<LayoutNodeCtx>,
        ids: &[Option<NodeId>],
        idx: usize,
        origin: (f32, f32),
        measurer: &mut TextMeasurer,
    ) -> OgResult<LaidOut> {
        let node = &self.nodes[idx];
        let nid = ids[idx]
            .ok_or_else(|| OgError::render(RenderStage::Layout, "layout node was not built"))?;
        let l = taffy
            .layout(nid)
            .map_err(|e| OgError::render(RenderStage::Layout, e.to_string()))?;
        let rect = RectPx {
            x: origin.0 + l.location.x,
            y: origin.1 + l.location.y,
            w: l.size.width,
            h: l.size.height,
        };

        let item = match &node.kind {
            NodeKind::Box(d) => LaidOutItem::Box(*d),
            NodeKind::Avatar => LaidOutItem::Avatar,
            NodeKind::Text(_, block) => {
                // Slack absorbs layout rounding so the final break matches the measured one.
                let shaped = measurer.shape(block, Some(rect.w + 1.0))?;
                LaidOutItem::Text {
                    block: block.clone(),
                    shaped,
                }
            }
        };

        let children = node
            .children
            .iter()
            .map(|&c| self.collect(taffy, ids, c, (rect.x, rect.y), measurer))
            .collect::<OgResult<Vec<_>>>()?;

        Ok(LaidOut {
            rect,
            item,
            children,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/layout.rs"]
mod tests;
