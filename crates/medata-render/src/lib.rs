//! Renders an accumulated catalog document as a raster image of colored
//! tag labels.

pub mod color;
pub mod error;
mod glyph;
pub mod layout;

pub use color::LabelPalette;
pub use error::RenderError;
pub use layout::{RenderConfig, TagRenderer, encode_png};
