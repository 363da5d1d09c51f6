//! Fixed-metric glyph drawing.
//!
//! Labels are measured and drawn with a built-in fixed-cell "font": every
//! visible character occupies one cell, and glyphs are simple filled boxes
//! whose height depends on the character class. Metrics never depend on
//! system fonts.

use image::{Rgb, RgbImage};

/// Horizontal advance per character cell.
pub const ADVANCE: u32 = 7;

/// Line height; also the measured height of any non-empty text.
pub const LINE_HEIGHT: u32 = 12;

/// Filled width of a glyph inside its cell.
const GLYPH_WIDTH: u32 = 5;

/// Box height for lowercase glyphs.
const X_HEIGHT: u32 = 7;

/// Box height for punctuation and other glyphs.
const OTHER_HEIGHT: u32 = 8;

/// Measured pixel size of `text`: one cell per visible character, fixed
/// line height. Control characters are skipped, matching [`draw_text`].
#[must_use]
pub fn measure(text: &str) -> (u32, u32) {
    let cells = text.chars().filter(|c| !c.is_control()).count() as u32;
    (cells * ADVANCE, LINE_HEIGHT)
}

/// Draw `text` starting at `(x, y)` (top-left corner of the line box).
/// Pixels outside the canvas are clipped.
pub fn draw_text(canvas: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let mut cell_x = x;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        if ch != ' ' {
            let glyph_height = if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
                LINE_HEIGHT
            } else if ch.is_ascii_lowercase() {
                X_HEIGHT
            } else {
                OTHER_HEIGHT
            };
            // Glyph boxes sit on the baseline at the bottom of the line box.
            let top = y + (LINE_HEIGHT - glyph_height);
            fill_rect(canvas, cell_x, top, GLYPH_WIDTH, glyph_height, color);
        }
        cell_x += ADVANCE;
    }
}

/// Fill a rectangle, clipping to the canvas bounds.
pub fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = (x + width).min(canvas.width());
    let y_end = (y + height).min(canvas.height());
    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}
