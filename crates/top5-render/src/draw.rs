//! Low-level raster helpers: blended fills, cover-cropping, and
//! baseline-aligned text drawn from glyph outlines.

use ab_glyph::{Font, FontRef, Glyph, PxScale, ScaleFont, point};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage, imageops};

use top5_core::Rgba;
use top5_core::theme::{GradientDirection, GradientSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Source-over blend of `color` (scaled by `coverage`) onto one pixel.
fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, color: Rgba, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let alpha = (color.a as f32 / 255.0 * coverage).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    let mix = |dst: u8, src: u8| (dst as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8;
    px.0 = [
        mix(px.0[0], color.r),
        mix(px.0[1], color.g),
        mix(px.0[2], color.b),
        px.0[3].max((alpha * 255.0).round() as u8),
    ];
}

/// Alpha-blended axis-aligned rectangle fill, clamped to the canvas.
pub fn fill_rect(img: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32, color: Rgba) {
    for dy in 0..h as i64 {
        for dx in 0..w as i64 {
            blend_pixel(img, x + dx, y + dy, color, 1.0);
        }
    }
}

/// Fill the whole canvas with a linear gradient. Vertical gradients run
/// top to bottom; diagonal ones along the top-left → bottom-right axis.
pub fn fill_gradient(img: &mut RgbaImage, spec: &GradientSpec) {
    let (w, h) = img.dimensions();
    match spec.direction {
        GradientDirection::Vertical => {
            for y in 0..h {
                let t = y as f32 / (h.saturating_sub(1).max(1)) as f32;
                let c = spec.color_at(t);
                for x in 0..w {
                    img.put_pixel(x, y, image::Rgba([c.r, c.g, c.b, 255]));
                }
            }
        },
        GradientDirection::Diagonal => {
            let span = (w + h).saturating_sub(2).max(1) as f32;
            for y in 0..h {
                for x in 0..w {
                    let c = spec.color_at((x + y) as f32 / span);
                    img.put_pixel(x, y, image::Rgba([c.r, c.g, c.b, 255]));
                }
            }
        },
    }
}

/// Scale an image to cover `w`×`h` (aspect-preserving) and crop the
/// centered window.
pub fn cover_crop(img: &DynamicImage, w: u32, h: u32) -> RgbaImage {
    let (iw, ih) = (img.width().max(1), img.height().max(1));
    let scale = (w as f64 / iw as f64).max(h as f64 / ih as f64);
    let sw = ((iw as f64 * scale).round() as u32).max(w);
    let sh = ((ih as f64 * scale).round() as u32).max(h);
    let resized = img.resize_exact(sw, sh, FilterType::Triangle).to_rgba8();
    imageops::crop_imm(&resized, (sw - w) / 2, (sh - h) / 2, w, h).to_image()
}

fn layout_glyphs(font: &FontRef<'_>, size: f32, text: &str) -> (Vec<Glyph>, f32) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut prev = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev_id) = prev {
            caret += scaled.kern(prev_id, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    (glyphs, caret)
}

/// Advance width of `text` at the given pixel size.
pub fn text_width(font: &FontRef<'_>, size: f32, text: &str) -> f32 {
    layout_glyphs(font, size, text).1
}

/// Draw `text` with its baseline at `baseline_y`. `x` is the left edge
/// for left alignment, the midpoint for centered text.
pub fn draw_text(
    img: &mut RgbaImage,
    color: Rgba,
    x: f32,
    baseline_y: f32,
    size: f32,
    font: &FontRef<'_>,
    text: &str,
    align: Align,
) {
    let (glyphs, width) = layout_glyphs(font, size, text);
    let origin_x = match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
    };
    for mut glyph in glyphs {
        glyph.position = point(origin_x + glyph.position.x, baseline_y);
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend_pixel(
                    img,
                    bounds.min.x as i64 + gx as i64,
                    bounds.min.y as i64 + gy as i64,
                    color,
                    coverage,
                );
            });
        }
    }
}

/// Greedy word wrap into at most `max_lines` lines of at most `max_width`
/// pixels; an overflowing final line is truncated with an ellipsis.
pub fn wrap_text(
    font: &FontRef<'_>,
    size: f32,
    text: &str,
    max_width: f32,
    max_lines: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(font, size, &candidate) > max_width && !line.is_empty() {
            if lines.len() + 1 < max_lines {
                lines.push(std::mem::take(&mut line));
                line = word.to_string();
            } else {
                lines.push(format!("{line}..."));
                return lines;
            }
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
