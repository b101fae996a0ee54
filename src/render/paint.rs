//! Paint commands: the flat display list handed to the rasterizer.

use std::sync::Arc;

use crate::render::layout::{ElementKind, LayoutNode};
use crate::surface::ImageAsset;
use crate::Rgb;

#[derive(Debug, Clone)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: (u8, u8, u8, u8),
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
        bold: bool,
        rgba: (u8, u8, u8, u8),
    },
    Image {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        asset: Arc<ImageAsset>,
    },
}

/// Build the display list for a laid-out surface.
///
/// The first command always fills the whole capture with the opaque host
/// background; rasterizers render uncovered regions as undefined otherwise.
pub fn build_display_list(
    background: Rgb,
    width: u32,
    height: u32,
    nodes: &[LayoutNode],
) -> Vec<PaintCommand> {
    let mut commands = Vec::with_capacity(nodes.len() + 1);
    commands.push(PaintCommand::SolidRect {
        x: 0,
        y: 0,
        width,
        height,
        rgba: (background.r, background.g, background.b, 255),
    });

    for node in nodes {
        match node.kind {
            ElementKind::Panel => {
                if let Some(fill) = node.fill {
                    commands.push(PaintCommand::SolidRect {
                        x: node.rect.x,
                        y: node.rect.y,
                        width: node.rect.width,
                        height: node.rect.height,
                        rgba: (fill.r, fill.g, fill.b, 255),
                    });
                }
            }
            ElementKind::TextRun => {
                commands.push(PaintCommand::Text {
                    x: node.rect.x,
                    y: node.rect.y,
                    text: node.text.clone(),
                    scale: node.scale,
                    bold: node.bold,
                    rgba: (node.color.r, node.color.g, node.color.b, 255),
                });
            }
            ElementKind::Picture => {
                if let Some(asset) = &node.image {
                    commands.push(PaintCommand::Image {
                        x: node.rect.x,
                        y: node.rect.y,
                        width: node.rect.width,
                        height: node.rect.height,
                        asset: asset.clone(),
                    });
                }
            }
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::Rect;

    #[test]
    fn background_comes_first() {
        let commands = build_display_list(Rgb::WHITE, 100, 50, &[]);
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            PaintCommand::SolidRect { width, height, rgba, .. } => {
                assert_eq!((*width, *height), (100, 50));
                assert_eq!(*rgba, (255, 255, 255, 255));
            }
            _ => panic!("expected background rect"),
        }
    }

    #[test]
    fn text_nodes_become_text_commands() {
        let node = LayoutNode {
            rect: Rect { x: 4, y: 8, width: 80, height: 8 },
            kind: ElementKind::TextRun,
            text: "hi".into(),
            scale: 1,
            bold: false,
            color: Rgb::BLACK,
            fill: None,
            image: None,
        };
        let commands = build_display_list(Rgb::WHITE, 100, 50, &[node]);
        assert!(matches!(commands[1], PaintCommand::Text { x: 4, y: 8, .. }));
    }
}
