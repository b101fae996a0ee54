//! Block layout for surface trees.
//!
//! The model is deliberately small: blocks stack vertically, text wraps at
//! fixed 8 px character cells (headings scale the cell), images keep their
//! aspect ratio at the available width. Visual transforms are not applied
//! here; the rasterizer folds the root transform into its device scale.

use std::sync::Arc;

use crate::render::glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::surface::{ImageAsset, NodeKind, SurfaceNode};
use crate::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// What a laid-out box draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Background panel behind a block
    Panel,
    /// Wrapped text lines
    TextRun,
    /// Raster image
    Picture,
}

/// A positioned box ready to be painted.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub rect: Rect,
    pub kind: ElementKind,
    /// Wrapped text, lines separated by '\n' (TextRun only)
    pub text: String,
    pub scale: u32,
    pub bold: bool,
    pub color: Rgb,
    pub fill: Option<Rgb>,
    pub image: Option<Arc<ImageAsset>>,
}

impl LayoutNode {
    fn panel(rect: Rect, fill: Rgb) -> Self {
        Self {
            rect,
            kind: ElementKind::Panel,
            text: String::new(),
            scale: 1,
            bold: false,
            color: Rgb::BLACK,
            fill: Some(fill),
            image: None,
        }
    }
}

/// Wrap text into lines of at most `chars_per_line` characters, breaking on
/// whitespace. Words longer than a line are emitted unbroken.
fn wrap_text(text: &str, chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if !cur.is_empty() && cur.chars().count() + 1 + word.chars().count() > chars_per_line {
            lines.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

fn walk(node: &SurfaceNode, x: f32, avail: f32, y: f32, out: &mut Vec<LayoutNode>) -> f32 {
    let style = &node.style;
    let margin = style.margin;

    match node.kind {
        NodeKind::Block => {
            let width = style.width.unwrap_or(avail).min(avail).max(0.0);
            let pad = style.padding;
            let top = y + margin;

            // Reserve the panel slot now so the fill paints under the children
            let panel_idx = style.background.map(|fill| {
                out.push(LayoutNode::panel(
                    Rect { x: x.round() as i32, y: top.round() as i32, width: width.round() as u32, height: 0 },
                    fill,
                ));
                out.len() - 1
            });

            let inner_w = (width - pad * 2.0).max(1.0);
            let mut cursor = top + pad;
            for child in &node.children {
                cursor = walk(child, x + pad, inner_w, cursor, out);
            }

            let mut height = (cursor + pad) - top;
            if let Some(min_h) = style.height {
                height = height.max(min_h);
            }
            if let Some(idx) = panel_idx {
                out[idx].rect.height = height.round() as u32;
            }
            top + height + margin
        }

        NodeKind::Text => {
            let pad = style.padding;
            let cell = (GLYPH_WIDTH * style.font_scale.max(1)) as f32;
            let content_w = (avail - pad * 2.0).max(cell);
            let chars_per_line = ((content_w / cell) as usize).max(1);

            let lines = wrap_text(&node.text, chars_per_line);
            if lines.is_empty() {
                return y;
            }
            let line_h = (GLYPH_HEIGHT * style.font_scale.max(1)) as f32;
            let box_h = lines.len() as f32 * line_h;
            out.push(LayoutNode {
                rect: Rect {
                    x: (x + pad).round() as i32,
                    y: (y + margin + pad).round() as i32,
                    width: content_w.round() as u32,
                    height: box_h.round() as u32,
                },
                kind: ElementKind::TextRun,
                text: lines.join("\n"),
                scale: style.font_scale.max(1),
                bold: style.bold,
                color: style.color,
                fill: None,
                image: None,
            });
            y + margin + pad * 2.0 + box_h + margin
        }

        NodeKind::Image => {
            let width = style.width.unwrap_or(avail).min(avail).max(1.0);
            let height = style.height.unwrap_or_else(|| {
                // Preserve the source aspect ratio when the asset is already
                // decoded; fall back to a square box otherwise
                node.image
                    .as_ref()
                    .and_then(|a| a.decoded())
                    .map(|d| width * d.height as f32 / d.width.max(1) as f32)
                    .unwrap_or(width)
            });
            out.push(LayoutNode {
                rect: Rect {
                    x: x.round() as i32,
                    y: (y + margin).round() as i32,
                    width: width.round() as u32,
                    height: height.round() as u32,
                },
                kind: ElementKind::Picture,
                text: String::new(),
                scale: 1,
                bold: false,
                color: style.color,
                fill: None,
                image: node.image.clone(),
            });
            y + margin + height + margin
        }
    }
}

/// Lay out a surface tree at the given width.
///
/// Returns the positioned boxes in paint order and the total content height
/// in logical pixels. Height is derived purely from content, so a node that
/// rendered at zero size on screen still lays out to its intrinsic height
/// here.
pub fn layout_surface(root: &SurfaceNode, width: u32) -> (Vec<LayoutNode>, u32) {
    let mut nodes = Vec::new();
    let height = walk(root, 0.0, width as f32, 0.0, &mut nodes);
    (nodes, height.round().max(0.0) as u32)
}
