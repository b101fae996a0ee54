//! Surface preparation: staging an off-screen, full-scale clone.
//!
//! Given a reference to a live node, produce a detached structural copy,
//! strip its display transform, force the nominal document width and attach
//! it to an invisible host on the live page. The host is removed when the
//! [`StagedSurface`] guard drops, so the page is restored on every exit
//! path, including a caller abandoning the export mid-flight.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::surface::{HostNode, LivePage, SurfaceNode};
use crate::{ExportConfig, Rgb};

/// Horizontal offset placing hosts outside the visible viewport. Off-screen
/// rather than hidden: hidden nodes are not rasterizable.
const OFFSCREEN_X: f32 = -9999.0;

/// A staged clone attached to the live page, removed again on drop.
pub struct StagedSurface<'p> {
    page: &'p LivePage,
    host_id: u64,
    host: HostNode,
}

/// Stage the target node for capture.
///
/// Fails fast with [`Error::ElementNotFound`] before any page mutation when
/// no target was supplied.
pub fn prepare<'p>(
    page: &'p LivePage,
    target: Option<&SurfaceNode>,
    config: &ExportConfig,
) -> Result<StagedSurface<'p>> {
    let node = target.ok_or(Error::ElementNotFound)?;

    let mut clone = node.clone();
    // Remove any thumbnail transform and force the nominal width so capture
    // is true-scale regardless of how the node was being displayed
    clone.style.transform = None;
    clone.style.width = Some(config.nominal_width as f32);

    let host = HostNode {
        offset_x: OFFSCREEN_X,
        width: config.nominal_width as f32,
        background: config.background,
        root: Arc::new(clone),
    };
    let host_id = page.attach_host(host.clone());

    log::debug!("staged surface as host {} at width {}", host_id, config.nominal_width);
    Ok(StagedSurface { page, host_id, host })
}

impl StagedSurface<'_> {
    pub fn root(&self) -> Arc<SurfaceNode> {
        self.host.root.clone()
    }

    pub fn width(&self) -> u32 {
        self.host.width as u32
    }

    pub fn background(&self) -> Rgb {
        self.host.background
    }

    /// Wait until the staged clone is ready to capture.
    ///
    /// Image assets decode on blocking worker threads while this polls their
    /// readiness, returning as soon as everything has settled. When the
    /// budget expires the capture proceeds anyway; a surface with stuck
    /// assets renders without them rather than stalling the export.
    pub async fn settle(&self, config: &ExportConfig) {
        let pending: Vec<_> = self
            .host
            .root
            .assets()
            .into_iter()
            .filter(|asset| !asset.is_ready())
            .collect();
        if pending.is_empty() {
            return;
        }

        for asset in &pending {
            let asset = asset.clone();
            let _ = tokio::task::spawn_blocking(move || {
                if let Err(e) = asset.decode() {
                    log::warn!("asset decode failed during settle: {}", e);
                }
            });
        }

        let deadline = Instant::now() + Duration::from_millis(config.settle_budget_ms);
        while !pending.iter().all(|asset| asset.is_ready()) {
            if Instant::now() >= deadline {
                log::warn!(
                    "settle budget of {}ms expired with {} asset(s) still pending",
                    config.settle_budget_ms,
                    pending.iter().filter(|a| !a.is_ready()).count()
                );
                return;
            }
            tokio::time::sleep(Duration::from_millis(config.settle_poll_ms)).await;
        }
    }
}

impl Drop for StagedSurface<'_> {
    fn drop(&mut self) {
        self.page.detach_host(self.host_id);
    }
}
