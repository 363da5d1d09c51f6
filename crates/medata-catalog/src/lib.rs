//! Catalog document model, metadata accumulator, and the per-page
//! extraction pipeline.

pub mod document;
pub mod error;
pub mod loader;
pub mod pipeline;

pub use document::{CATALOG_NAME, CatalogDocument, Chunk, TagMap, TagRecord};
pub use error::CatalogError;
pub use loader::{DocumentLoader, PdfLoader};
pub use pipeline::CatalogPipeline;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
