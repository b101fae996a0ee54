//! cvpress — resume surface export engine
//!
//! A library for turning a styled resume **surface** (a renderable visual
//! node tree) into a paginated A4 PDF document. The pipeline has three
//! strictly forward stages:
//!
//! 1. **Surface preparation**: deep-clone the target node, strip its visual
//!    transform, force the nominal document width and attach the clone to an
//!    invisible off-screen host on the live page.
//! 2. **Rasterization**: lay out and paint the prepared host into a single
//!    RGBA bitmap at a fixed device-pixel ratio.
//! 3. **Pagination & encoding**: scale the bitmap to the page width, slice it
//!    into contiguous page-height bands and assemble the PDF.
//!
//! The off-screen host is removed again on every exit path, so the live page
//! is left exactly as it was found.
//!
//! # Example
//!
//! ```no_run
//! use cvpress::{export, template, ExportConfig, LivePage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resume: template::ResumeData = serde_json::from_str("{}")?;
//! let surface = template::compose_surface(&resume);
//! let page = LivePage::new(vec![surface]);
//!
//! let config = ExportConfig::default();
//! let rt = tokio::runtime::Runtime::new()?;
//! let doc = rt.block_on(export::export_pdf(&page, page.root(0), &config))?;
//! println!("PDF: {} bytes", doc.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

// Surface model: styled node trees and the live page they hang off
pub mod surface;
pub use surface::{ImageAsset, LivePage, NodeKind, Style, SurfaceNode, Transform};

// Rendering: layout, paint commands, rasterizer
pub mod render;

// Export pipeline: preparation, pagination, PDF assembly
pub mod export;
pub use export::PdfDocument;

// Delivery collaborators: download filenames, share attachment payloads
pub mod deliver;

// Vibe-check upload boundary
pub mod analyze;

// Themed surface composition from resume data
pub mod template;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex color. Returns `None` on any
    /// malformed input rather than guessing.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

/// Physical output page format.
///
/// Page dimensions are expressed in PDF user-space points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    /// ISO A4, portrait: 210 × 297 mm.
    A4Portrait,
}

impl PageFormat {
    /// Page width in points.
    pub fn width_pt(self) -> f32 {
        match self {
            PageFormat::A4Portrait => 595.276,
        }
    }

    /// Page height in points.
    pub fn height_pt(self) -> f32 {
        match self {
            PageFormat::A4Portrait => 841.89,
        }
    }
}

/// Configuration for the export pipeline
///
/// This struct contains the knobs that used to be hidden literals in the
/// export path. The defaults are chosen to match the on-screen editor:
/// - `nominal_width` is the standard document width every export is laid out
///   at, regardless of how the surface was being displayed
/// - `pixel_ratio` oversamples the raster for print sharpness
/// - the settle fields bound the readiness wait for image decoding before
///   capture (an explicit check, not a blind fixed delay)
///
/// # Examples
///
/// ```
/// let cfg = cvpress::ExportConfig::default();
/// assert_eq!(cfg.nominal_width, 800);
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Nominal document width in CSS-like pixels; the prepared clone is
    /// forced to this width
    pub nominal_width: u32,
    /// Device-pixel-ratio multiplier applied at rasterization
    pub pixel_ratio: f32,
    /// Interval between readiness polls while the staged surface settles
    pub settle_poll_ms: u64,
    /// Maximum total settle wait; capture proceeds when this expires even if
    /// some assets are still pending
    pub settle_budget_ms: u64,
    /// Opaque background painted behind the staged surface
    pub background: Rgb,
    /// Output page format
    pub page: PageFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            nominal_width: 800,
            pixel_ratio: 2.0,
            settle_poll_ms: 25,
            settle_budget_ms: 600,
            background: Rgb::WHITE,
            page: PageFormat::A4Portrait,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.nominal_width, 800);
        assert_eq!(config.pixel_ratio, 2.0);
        assert_eq!(config.background, Rgb::WHITE);
        assert_eq!(config.page, PageFormat::A4Portrait);
    }

    #[test]
    fn test_a4_dimensions() {
        let page = PageFormat::A4Portrait;
        assert!(page.width_pt() > 595.0 && page.width_pt() < 596.0);
        assert!(page.height_pt() > 841.0 && page.height_pt() < 842.0);
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#ffffff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("203040"), Some(Rgb::new(0x20, 0x30, 0x40)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }
}
