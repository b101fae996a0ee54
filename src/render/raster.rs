//! Rasterizer: executes a display list into an RGBA bitmap.

use crate::render::glyphs::{self, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::render::paint::PaintCommand;
use crate::render::Bitmap;
use crate::surface::DecodedImage;

/// Rasterize a display list laid out at `width` x `height` logical pixels
/// into a bitmap at `scale`x device pixels.
///
/// A zero logical area (or a scale that collapses it) yields an empty
/// bitmap; callers treat that as the rendering-failure signal.
pub fn rasterize(width: u32, height: u32, scale: f32, commands: &[PaintCommand]) -> Bitmap {
    let dev_w = (width as f32 * scale).round().max(0.0) as u32;
    let dev_h = (height as f32 * scale).round().max(0.0) as u32;
    if dev_w == 0 || dev_h == 0 {
        return Bitmap::empty(dev_w, dev_h, scale);
    }

    let mut buf = Buffer { width: dev_w, height: dev_h, pixels: vec![0u8; (dev_w * dev_h * 4) as usize] };

    for command in commands {
        match command {
            PaintCommand::SolidRect { x, y, width, height, rgba } => {
                buf.fill_rect_scaled(*x, *y, *width, *height, scale, *rgba);
            }
            PaintCommand::Text { x, y, text, scale: font_scale, bold, rgba } => {
                draw_text(&mut buf, *x, *y, text, *font_scale, *bold, scale, *rgba);
            }
            PaintCommand::Image { x, y, width, height, asset } => {
                // Not-yet-decoded assets are skipped rather than blocking the
                // capture; the settle wait is responsible for readiness
                if let Some(decoded) = asset.decoded() {
                    draw_image(&mut buf, *x, *y, *width, *height, scale, decoded);
                }
            }
        }
    }

    Bitmap { width: dev_w, height: dev_h, scale, pixels: buf.pixels }
}

struct Buffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Buffer {
    fn put(&mut self, x: i64, y: i64, rgba: (u8, u8, u8, u8)) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        let (r, g, b, a) = rgba;
        if a == 255 {
            self.pixels[idx] = r;
            self.pixels[idx + 1] = g;
            self.pixels[idx + 2] = b;
            self.pixels[idx + 3] = 255;
        } else if a > 0 {
            // Source-over blend against the existing pixel
            let af = a as u32;
            let inv = 255 - af;
            self.pixels[idx] = ((r as u32 * af + self.pixels[idx] as u32 * inv) / 255) as u8;
            self.pixels[idx + 1] = ((g as u32 * af + self.pixels[idx + 1] as u32 * inv) / 255) as u8;
            self.pixels[idx + 2] = ((b as u32 * af + self.pixels[idx + 2] as u32 * inv) / 255) as u8;
            self.pixels[idx + 3] = 255;
        }
    }

    /// Fill a logical-pixel rect, scaling to device pixels with clamping.
    fn fill_rect_scaled(&mut self, x: i32, y: i32, w: u32, h: u32, scale: f32, rgba: (u8, u8, u8, u8)) {
        let x0 = (x as f32 * scale).round() as i64;
        let y0 = (y as f32 * scale).round() as i64;
        let x1 = ((x as f32 + w as f32) * scale).round() as i64;
        let y1 = ((y as f32 + h as f32) * scale).round() as i64;
        for py in y0.max(0)..y1.min(self.height as i64) {
            for px in x0.max(0)..x1.min(self.width as i64) {
                self.put(px, py, rgba);
            }
        }
    }
}

fn draw_text(
    buf: &mut Buffer,
    x: i32,
    y: i32,
    text: &str,
    font_scale: u32,
    bold: bool,
    scale: f32,
    rgba: (u8, u8, u8, u8),
) {
    let font_scale = font_scale.max(1);
    let cell_w = (GLYPH_WIDTH * font_scale) as i32;
    let cell_h = (GLYPH_HEIGHT * font_scale) as i32;

    for (line_idx, line) in text.lines().enumerate() {
        let line_y = y + line_idx as i32 * cell_h;
        for (col, ch) in line.chars().enumerate() {
            let rows = glyphs::glyph(ch);
            let glyph_x = x + col as i32 * cell_w;
            for (gy, row) in rows.iter().enumerate() {
                if *row == 0 {
                    continue;
                }
                for gx in 0..GLYPH_WIDTH {
                    if row & (1 << gx) == 0 {
                        continue;
                    }
                    let px = glyph_x + (gx * font_scale) as i32;
                    let py = line_y + gy as i32 * font_scale as i32;
                    buf.fill_rect_scaled(px, py, font_scale, font_scale, scale, rgba);
                    if bold {
                        // Double-strike one device pixel to the right
                        let dx0 = ((px + font_scale as i32) as f32 * scale).round() as i64;
                        let dy0 = (py as f32 * scale).round() as i64;
                        let dy1 = ((py + font_scale as i32) as f32 * scale).round() as i64;
                        for dy in dy0.max(0)..dy1 {
                            buf.put(dx0, dy, rgba);
                        }
                    }
                }
            }
        }
    }
}

fn draw_image(buf: &mut Buffer, x: i32, y: i32, w: u32, h: u32, scale: f32, src: &DecodedImage) {
    if src.width == 0 || src.height == 0 || w == 0 || h == 0 {
        return;
    }
    let x0 = (x as f32 * scale).round() as i64;
    let y0 = (y as f32 * scale).round() as i64;
    let dw = (w as f32 * scale).round().max(1.0) as i64;
    let dh = (h as f32 * scale).round().max(1.0) as i64;

    for dy in 0..dh {
        let py = y0 + dy;
        if py < 0 || py >= buf.height as i64 {
            continue;
        }
        let sy = (dy * src.height as i64 / dh).min(src.height as i64 - 1) as usize;
        for dx in 0..dw {
            let px = x0 + dx;
            if px < 0 || px >= buf.width as i64 {
                continue;
            }
            let sx = (dx * src.width as i64 / dw).min(src.width as i64 - 1) as usize;
            let idx = (sy * src.width as usize + sx) * 4;
            let rgba = (src.pixels[idx], src.pixels[idx + 1], src.pixels[idx + 2], src.pixels[idx + 3]);
            buf.put(px, py, rgba);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::paint::PaintCommand;

    fn white_bg(w: u32, h: u32) -> PaintCommand {
        PaintCommand::SolidRect { x: 0, y: 0, width: w, height: h, rgba: (255, 255, 255, 255) }
    }

    #[test]
    fn scale_doubles_device_dimensions() {
        let bmp = rasterize(100, 50, 2.0, &[white_bg(100, 50)]);
        assert_eq!((bmp.width, bmp.height), (200, 100));
        assert_eq!(bmp.pixels.len(), 200 * 100 * 4);
    }

    #[test]
    fn zero_area_is_empty() {
        assert!(rasterize(0, 50, 2.0, &[]).is_empty());
        assert!(rasterize(100, 0, 2.0, &[]).is_empty());
        // A collapsing transform folded into the scale also empties the capture
        assert!(rasterize(100, 50, 0.0, &[]).is_empty());
    }

    #[test]
    fn text_leaves_ink_on_background() {
        let commands = vec![
            white_bg(100, 20),
            PaintCommand::Text { x: 2, y: 2, text: "Hi".into(), scale: 1, bold: false, rgba: (0, 0, 0, 255) },
        ];
        let bmp = rasterize(100, 20, 1.0, &commands);
        let mut found_black = false;
        let mut found_white = false;
        for px in bmp.pixels.chunks(4) {
            if px[0] == 0 && px[1] == 0 && px[2] == 0 {
                found_black = true;
            }
            if px[0] == 255 && px[1] == 255 && px[2] == 255 {
                found_white = true;
            }
        }
        assert!(found_black, "expected glyph ink");
        assert!(found_white, "expected background");
    }

    #[test]
    fn rects_are_clipped_to_the_buffer() {
        let commands = vec![PaintCommand::SolidRect { x: -10, y: -10, width: 1000, height: 1000, rgba: (1, 2, 3, 255) }];
        let bmp = rasterize(10, 10, 1.0, &commands);
        assert_eq!(bmp.pixels[0], 1);
        assert_eq!(bmp.pixels[bmp.pixels.len() - 2], 3);
    }
}
