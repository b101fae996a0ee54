//! Pagination & encoding: slice a tall bitmap into page bands and assemble
//! the PDF.
//!
//! The bitmap is scaled proportionally so its width matches the page width;
//! every page then draws the same full image, translated so that successive
//! pages expose successive vertical bands. The page media box clips whatever
//! overshoots, so no pixel is resampled or duplicated between pages.

use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::error::{Error, Result};
use crate::render::Bitmap;
use crate::PageFormat;

/// One page's vertical band of the source bitmap, in bitmap pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub top: u32,
    pub height: u32,
}

/// Partition a bitmap of the given height into page-height bands.
///
/// Bands are contiguous, top to bottom, no overlap and no gap; the last band
/// may be shorter than a page. `ceil(height / page_height)` bands total.
pub fn page_slices(bitmap_height: u32, page_height: u32) -> Vec<PageSlice> {
    if bitmap_height == 0 || page_height == 0 {
        return Vec::new();
    }
    let mut slices = Vec::new();
    let mut top = 0u32;
    while top < bitmap_height {
        let height = page_height.min(bitmap_height - top);
        slices.push(PageSlice { top, height });
        top += height;
    }
    slices
}

/// Printable page height expressed in bitmap pixels, for a bitmap scaled to
/// the page width.
pub fn page_height_px(bitmap_width: u32, format: PageFormat) -> u32 {
    if bitmap_width == 0 {
        return 0;
    }
    (format.height_pt() / format.width_pt() * bitmap_width as f32).floor() as u32
}

const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Assemble the paginated PDF for a captured bitmap.
///
/// The output is deterministic: no timestamps or document IDs are written,
/// so exporting the same surface twice yields byte-identical documents.
pub fn assemble_pdf(bitmap: &Bitmap, format: PageFormat) -> Result<Vec<u8>> {
    if bitmap.is_empty() {
        return Err(Error::EncodeError("cannot paginate an empty bitmap".into()));
    }

    let page_w = format.width_pt();
    let page_h = format.height_pt();
    let image_h = bitmap.height as f32 * page_w / bitmap.width as f32;

    let slices = page_slices(bitmap.height, page_height_px(bitmap.width, format));
    let page_count = slices.len().max(1);

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let image_id = alloc();
    let page_ids: Vec<Ref> = (0..page_count).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..page_count).map(|_| alloc()).collect();

    // One shared XObject holds the entire capture; pages only differ in the
    // translation they draw it at
    let rgb = bitmap.rgb_bytes();
    let compressed = compress_to_vec_zlib(&rgb, 6);
    {
        let mut xobj = pdf.image_xobject(image_id, &compressed);
        xobj.filter(Filter::FlateDecode);
        xobj.width(bitmap.width as i32);
        xobj.height(bitmap.height as i32);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
    }

    for (i, content_id) in content_ids.iter().enumerate() {
        let consumed = i as f32 * page_h;
        // Translate so this page's band lands inside the media box; the page
        // boundary clips the rest of the image
        let ty = page_h - image_h + consumed;
        let mut content = Content::new();
        content.save_state();
        content.transform([page_w, 0.0, 0.0, image_h, 0.0, ty]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        let raw = content.finish();
        let stream = compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(*content_id, &stream).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_count as i32);

    for i in 0..page_count {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut xobjects = resources.x_objects();
        xobjects.pair(IMAGE_NAME, image_id);
    }

    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bitmap_is_a_single_slice() {
        let slices = page_slices(500, 1000);
        assert_eq!(slices, vec![PageSlice { top: 0, height: 500 }]);
    }

    #[test]
    fn exact_multiple_has_no_stub_slice() {
        let slices = page_slices(2000, 1000);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1], PageSlice { top: 1000, height: 1000 });
    }

    #[test]
    fn a4_page_height_matches_aspect() {
        // 800 px wide -> 800 * 841.89 / 595.276 = 1131.4... px per page
        assert_eq!(page_height_px(800, PageFormat::A4Portrait), 1131);
        assert_eq!(page_height_px(0, PageFormat::A4Portrait), 0);
    }

    #[test]
    fn empty_bitmap_does_not_paginate() {
        let bmp = Bitmap::empty(0, 100, 2.0);
        assert!(matches!(assemble_pdf(&bmp, PageFormat::A4Portrait), Err(Error::EncodeError(_))));
    }

    #[test]
    fn single_page_document_has_pdf_header() {
        let bmp = Bitmap { width: 4, height: 4, scale: 1.0, pixels: vec![255; 4 * 4 * 4] };
        let bytes = assemble_pdf(&bmp, PageFormat::A4Portrait).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 100);
    }
}
