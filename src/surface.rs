//! Surface model: styled visual node trees and the live page they hang off.
//!
//! A [`SurfaceNode`] is one node of a renderable document tree (the resume
//! preview the editor shows on screen). The export pipeline never draws the
//! live tree directly: it deep-clones the target node and attaches the clone
//! to a transient off-screen host slot on the [`LivePage`], so the visible
//! document is never mutated and nothing leaks once the export finishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::{Error, Result};
use crate::Rgb;

/// A CSS-like visual transform applied to a node for on-screen display
/// (thumbnail scaling, preview rotation). Stripped before rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub rotate_deg: f32,
}

impl Transform {
    pub fn identity() -> Self {
        Self { scale: 1.0, rotate_deg: 0.0 }
    }

    pub fn scaled(scale: f32) -> Self {
        Self { scale, rotate_deg: 0.0 }
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.rotate_deg == 0.0
    }
}

/// Computed visual style carried by every surface node.
///
/// Only the properties the rasterizer understands are modeled; they are the
/// "computed inline styles" a structural clone has to preserve.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Explicit width in px; `None` means fill the parent
    pub width: Option<f32>,
    /// Explicit height in px; blocks treat this as a minimum
    pub height: Option<f32>,
    /// Display transform, if any
    pub transform: Option<Transform>,
    /// Background fill; `None` is transparent
    pub background: Option<Rgb>,
    /// Foreground (text) color
    pub color: Rgb,
    /// Text size as a multiple of the 8 px base cell (headings use 2)
    pub font_scale: u32,
    pub bold: bool,
    /// Inner padding in px, all four sides
    pub padding: f32,
    /// Outer margin in px, top and bottom
    pub margin: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            transform: None,
            background: None,
            color: Rgb::BLACK,
            font_scale: 1,
            bold: false,
            padding: 0.0,
            margin: 0.0,
        }
    }
}

/// What a surface node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Container that stacks its children vertically
    Block,
    /// A run of text, wrapped at the available width
    Text,
    /// A raster image backed by an [`ImageAsset`]
    Image,
}

/// A decoded raster image: RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// An encoded image resource referenced by `Image` nodes.
///
/// Decoding is lazy and happens at most once; clones of a node share the
/// asset the way DOM clones share the browser's image cache. `is_ready`
/// flips to true once decoding has completed (successfully or not), which is
/// what the settle wait in the export pipeline polls for.
#[derive(Debug)]
pub struct ImageAsset {
    bytes: Vec<u8>,
    decoded: OnceLock<std::result::Result<DecodedImage, String>>,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self { bytes, decoded: OnceLock::new() })
    }

    /// Whether decoding has completed (either way).
    pub fn is_ready(&self) -> bool {
        self.decoded.get().is_some()
    }

    /// Force-decode the asset, returning the pixels.
    pub fn decode(&self) -> Result<&DecodedImage> {
        let slot = self.decoded.get_or_init(|| {
            image::load_from_memory(&self.bytes)
                .map(|img| {
                    let rgba = img.to_rgba8();
                    DecodedImage {
                        width: rgba.width(),
                        height: rgba.height(),
                        pixels: rgba.into_raw(),
                    }
                })
                .map_err(|e| format!("{}", e))
        });
        match slot {
            Ok(decoded) => Ok(decoded),
            Err(e) => Err(Error::RenderError(format!("image decode failed: {}", e))),
        }
    }

    /// The decoded pixels, if decoding has already succeeded. Never forces a
    /// decode; the rasterizer skips images that are not ready.
    pub fn decoded(&self) -> Option<&DecodedImage> {
        self.decoded.get().and_then(|r| r.as_ref().ok())
    }
}

/// One node of a renderable surface tree.
///
/// `Clone` is a structural deep copy: children are copied recursively and
/// every computed style travels with its node. Image assets are shared
/// between the original and the copy.
#[derive(Debug, Clone)]
pub struct SurfaceNode {
    pub kind: NodeKind,
    pub style: Style,
    pub text: String,
    pub image: Option<Arc<ImageAsset>>,
    pub children: Vec<SurfaceNode>,
}

impl SurfaceNode {
    pub fn block(style: Style) -> Self {
        Self { kind: NodeKind::Block, style, text: String::new(), image: None, children: Vec::new() }
    }

    pub fn text(text: impl Into<String>, style: Style) -> Self {
        Self { kind: NodeKind::Text, style, text: text.into(), image: None, children: Vec::new() }
    }

    pub fn image(asset: Arc<ImageAsset>, style: Style) -> Self {
        Self { kind: NodeKind::Image, style, text: String::new(), image: Some(asset), children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<SurfaceNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }

    /// Collect every image asset referenced below (and at) this node.
    pub fn assets(&self) -> Vec<Arc<ImageAsset>> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(asset) = &node.image {
                out.push(asset.clone());
            }
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// A transient off-screen host wrapping a staged clone.
///
/// Positioned outside the viewport (not merely hidden: hidden nodes are not
/// rasterizable) with a fixed width and an explicit opaque background.
#[derive(Debug, Clone)]
pub(crate) struct HostNode {
    /// Horizontal offset placing the host outside the viewport
    pub offset_x: f32,
    pub width: f32,
    pub background: Rgb,
    pub root: Arc<SurfaceNode>,
}

struct HostSlot {
    id: u64,
    host: HostNode,
}

/// The live document tree: the permanent on-screen roots plus whatever
/// off-screen hosts in-flight exports have attached.
///
/// Host insertion and removal are scoped per export invocation: each gets
/// its own slot, so overlapping exports (even of the same node) never touch
/// each other's hosts.
pub struct LivePage {
    roots: Vec<SurfaceNode>,
    hosts: Mutex<Vec<HostSlot>>,
    next_host_id: AtomicU64,
}

impl LivePage {
    pub fn new(roots: Vec<SurfaceNode>) -> Self {
        Self { roots, hosts: Mutex::new(Vec::new()), next_host_id: AtomicU64::new(1) }
    }

    /// A root node by index, as the export target reference.
    pub fn root(&self, index: usize) -> Option<&SurfaceNode> {
        self.roots.get(index)
    }

    /// Total node count across the page, attached hosts included. Used to
    /// verify that exports leave no nodes behind.
    pub fn node_count(&self) -> usize {
        let root_count: usize = self.roots.iter().map(|r| r.subtree_len()).sum();
        let host_count: usize = match self.hosts.lock() {
            Ok(hosts) => hosts.iter().map(|s| 1 + s.host.root.subtree_len()).sum(),
            Err(_) => 0,
        };
        root_count + host_count
    }

    /// Number of currently attached off-screen hosts.
    pub fn host_count(&self) -> usize {
        self.hosts.lock().map(|h| h.len()).unwrap_or(0)
    }

    /// True when every attached host lies entirely outside the visible
    /// viewport (off-screen, not merely hidden).
    pub fn hosts_offscreen(&self) -> bool {
        self.hosts
            .lock()
            .map(|hosts| hosts.iter().all(|s| s.host.offset_x + s.host.width <= 0.0))
            .unwrap_or(true)
    }

    pub(crate) fn attach_host(&self, host: HostNode) -> u64 {
        let id = self.next_host_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut hosts) = self.hosts.lock() {
            hosts.push(HostSlot { id, host });
        }
        id
    }

    pub(crate) fn detach_host(&self, id: u64) -> bool {
        if let Ok(mut hosts) = self.hosts.lock() {
            let before = hosts.len();
            hosts.retain(|s| s.id != id);
            return hosts.len() != before;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> SurfaceNode {
        SurfaceNode::text(text, Style::default())
    }

    #[test]
    fn clone_is_structural() {
        let tree = SurfaceNode::block(Style::default())
            .with_children(vec![leaf("a"), SurfaceNode::block(Style::default()).with_children(vec![leaf("b")])]);
        let copy = tree.clone();
        assert_eq!(copy.subtree_len(), 4);
        assert_eq!(copy.children[1].children[0].text, "b");
    }

    #[test]
    fn clone_shares_image_assets() {
        let asset = ImageAsset::new(vec![1, 2, 3]);
        let node = SurfaceNode::image(asset.clone(), Style::default());
        let copy = node.clone();
        assert!(Arc::ptr_eq(&copy.assets()[0], &asset));
    }

    #[test]
    fn attach_and_detach_host_restores_count() {
        let page = LivePage::new(vec![leaf("root")]);
        let before = page.node_count();

        let id = page.attach_host(HostNode {
            offset_x: -9999.0,
            width: 800.0,
            background: Rgb::WHITE,
            root: Arc::new(leaf("staged")),
        });
        assert_eq!(page.host_count(), 1);
        assert!(page.node_count() > before);

        assert!(page.detach_host(id));
        assert_eq!(page.host_count(), 0);
        assert_eq!(page.node_count(), before);
        assert!(!page.detach_host(id));
    }

    #[test]
    fn bad_image_bytes_decode_to_error_but_ready() {
        let asset = ImageAsset::new(vec![0, 1, 2, 3]);
        assert!(!asset.is_ready());
        assert!(asset.decode().is_err());
        assert!(asset.is_ready());
        assert!(asset.decoded().is_none());
    }
}
