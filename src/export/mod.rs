//! Export pipeline: surface preparation, rasterization, pagination.
//!
//! One export is a single sequential asynchronous operation; the caller
//! suspends at the settle wait and the rasterization call. Dropping the
//! returned future at any await point abandons the export, and the staged
//! host is still removed from the live page by the preparation guard.

pub mod paginate;
pub mod prepare;

use crate::error::{Error, Result};
use crate::render::{layout, paint, raster, Bitmap};
use crate::surface::{LivePage, SurfaceNode};
use crate::ExportConfig;

/// An assembled PDF, released to the caller as an opaque immutable artifact.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Capture the target surface into a bitmap: prepare, settle, rasterize.
///
/// A zero-area capture rejects with a rendering failure before pagination
/// ever runs; that is the primary signal that the surface never became
/// renderable (empty content, collapsing transform).
pub async fn render_surface(
    page: &LivePage,
    target: Option<&SurfaceNode>,
    config: &ExportConfig,
) -> Result<Bitmap> {
    let staged = prepare::prepare(page, target, config)?;
    staged.settle(config).await;

    let root = staged.root();
    let width = staged.width();
    let background = staged.background();
    // Preparation strips the root transform; fold whatever is left into the
    // device scale so an unstaged surface still captures at displayed size
    let transform_scale = root.style.transform.map(|t| t.scale).unwrap_or(1.0);
    let scale = config.pixel_ratio * transform_scale;

    let bitmap = tokio::task::spawn_blocking(move || {
        let (nodes, height) = layout::layout_surface(&root, width);
        let commands = paint::build_display_list(background, width, height, &nodes);
        raster::rasterize(width, height, scale, &commands)
    })
    .await
    .map_err(|e| Error::RenderError(format!("rasterizer task failed: {}", e)))?;

    if bitmap.is_empty() {
        return Err(Error::RenderError("surface rasterized to an empty bitmap".into()));
    }

    log::debug!(
        "captured {}x{} bitmap at {}x",
        bitmap.width,
        bitmap.height,
        bitmap.scale
    );
    Ok(bitmap)
    // The staged host is detached here, on success and failure alike
}

/// Run the full export: capture the surface and assemble the paginated PDF.
pub async fn export_pdf(
    page: &LivePage,
    target: Option<&SurfaceNode>,
    config: &ExportConfig,
) -> Result<PdfDocument> {
    let bitmap = render_surface(page, target, config).await?;
    let bytes = paginate::assemble_pdf(&bitmap, config.page)?;
    log::info!(
        "exported {} page(s), {} bytes",
        paginate::page_slices(bitmap.height, paginate::page_height_px(bitmap.width, config.page)).len(),
        bytes.len()
    );
    Ok(PdfDocument { bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Style;

    #[test]
    fn missing_target_rejects_without_touching_the_page() {
        let page = LivePage::new(vec![SurfaceNode::text("hi", Style::default())]);
        let before = page.node_count();
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt.block_on(export_pdf(&page, None, &ExportConfig::default())).err();
        assert!(matches!(err, Some(Error::ElementNotFound)));
        assert_eq!(page.node_count(), before);
    }

    #[test]
    fn empty_surface_is_a_rendering_failure() {
        let page = LivePage::new(vec![SurfaceNode::block(Style::default())]);
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(export_pdf(&page, page.root(0), &ExportConfig::default()))
            .err();
        assert!(matches!(err, Some(Error::RenderError(_))));
        // The failed export still cleaned up its host
        assert_eq!(page.host_count(), 0);
    }
}
