#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("only PDF files are supported for metadata generation (got .{0})")]
    UnsupportedFormat(String),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("tag extraction failed: {0}")]
    Extraction(#[from] medata_llm::LlmError),

    #[error("duplicate chunk id: {0}")]
    DuplicateChunk(String),

    #[error("document already finalized")]
    Finalized,

    #[error("page count {pages} does not match {chunks} recorded chunks")]
    PageCountMismatch { pages: usize, chunks: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
