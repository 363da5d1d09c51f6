use image::{Rgb, RgbImage};
use medata_catalog::CatalogDocument;
use serde_json::Value;

use crate::color::LabelPalette;
use crate::error::RenderError;
use crate::glyph;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_top: u32,
    /// Extra label box size beyond the measured text.
    pub padding: u32,
    /// Text offset from the label box corner.
    pub text_inset: u32,
    /// Vertical gap between label boxes.
    pub label_gap: u32,
    pub bottom_margin: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 1000,
            margin_left: 20,
            margin_top: 20,
            padding: 10,
            text_inset: 5,
            label_gap: 20,
            bottom_margin: 40,
        }
    }
}

/// One laid-out label box; geometry is independent of coloring.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Label {
    text: String,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Draws every valued tag of a document as a colored label box in a single
/// top-to-bottom column.
#[derive(Debug, Default)]
pub struct TagRenderer {
    config: RenderConfig,
}

impl TagRenderer {
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Compute label geometry: chunks in page order, tags in extraction
    /// order, one `"{tag}: {value}"` line per record carrying a value.
    fn layout(&self, document: &CatalogDocument) -> Vec<Label> {
        let cfg = &self.config;
        let mut labels = Vec::new();
        let mut cursor_y = cfg.margin_top;

        for chunk in document.chunks.values() {
            for (name, record) in &chunk.tags {
                let Some(value) = record.value.as_ref() else {
                    continue;
                };
                let text = format!("{name}: {}", display_value(value));
                let (text_width, text_height) = glyph::measure(&text);
                labels.push(Label {
                    text,
                    x: cfg.margin_left,
                    y: cursor_y,
                    width: text_width + cfg.padding,
                    height: text_height + cfg.padding,
                });
                cursor_y += text_height + cfg.label_gap;
            }
        }

        labels
    }

    /// Render the document onto a fresh canvas, growing it as labels run
    /// past the bottom margin. Growth copies the existing raster so labels
    /// already drawn keep their colors.
    pub fn render(&self, document: &CatalogDocument, palette: &mut LabelPalette) -> RgbImage {
        let cfg = &self.config;
        let mut canvas = RgbImage::from_pixel(cfg.width, cfg.height, BACKGROUND);

        let labels = self.layout(document);
        tracing::debug!(labels = labels.len(), "rendering tag labels");

        for label in &labels {
            let color = palette.next_color();
            glyph::fill_rect(&mut canvas, label.x, label.y, label.width, label.height, color);
            glyph::draw_text(
                &mut canvas,
                label.x + cfg.text_inset,
                label.y + cfg.text_inset,
                &label.text,
                TEXT_COLOR,
            );

            let next_y = label.y + glyph::LINE_HEIGHT + cfg.label_gap;
            if next_y > canvas.height().saturating_sub(cfg.bottom_margin) {
                let new_height = next_y + cfg.bottom_margin;
                tracing::debug!(new_height, "growing canvas");
                canvas = grow(canvas, new_height);
            }
        }

        canvas
    }
}

/// Allocate a taller canvas and copy the existing raster into it, keeping
/// the drawing cursor valid.
fn grow(canvas: RgbImage, new_height: u32) -> RgbImage {
    let mut grown = RgbImage::from_pixel(canvas.width(), new_height, BACKGROUND);
    image::imageops::replace(&mut grown, &canvas, 0, 0);
    grown
}

/// Strings display raw (no quotes); other JSON values use their compact form.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encode the rendered canvas as PNG bytes.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    image.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )?;
    Ok(bytes)
}
