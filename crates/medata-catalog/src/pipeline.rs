use std::path::Path;
use std::pin::Pin;

use medata_llm::error::LlmError;
use medata_llm::extractor::Extractor;
use medata_llm::provider::LlmProvider;

use crate::document::{CatalogDocument, TagMap};
use crate::error::CatalogError;
use crate::loader::DocumentLoader;

/// System preamble for the tag extractor.
const TAG_SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts structured data.";

pub type TagFuture = Pin<Box<dyn Future<Output = Result<TagMap, LlmError>> + Send>>;
pub type ExtractFn = Box<dyn Fn(&str) -> TagFuture + Send + Sync>;

/// Wrap a provider as the pipeline's extraction function: one chat call per
/// page with the tag-extraction prompt, parsed into a [`TagMap`].
pub fn llm_extract_fn<P>(provider: P) -> ExtractFn
where
    P: LlmProvider + Clone + 'static,
{
    Box::new(move |text: &str| {
        let provider = provider.clone();
        let input = format!(
            "Extract key information as JSON format where each key has a 'value' and 'evidence'. Text: {text}"
        );
        Box::pin(async move {
            Extractor::new(&provider)
                .with_preamble(TAG_SYSTEM_PROMPT)
                .extract::<TagMap>(&input)
                .await
        })
    })
}

/// Runs one input file through load -> per-page extraction -> accumulation.
pub struct CatalogPipeline {
    loader: Box<dyn DocumentLoader>,
    extract_fn: ExtractFn,
}

impl CatalogPipeline {
    pub fn new(loader: Box<dyn DocumentLoader>, extract_fn: ExtractFn) -> Self {
        Self { loader, extract_fn }
    }

    /// Build the catalog document for one input file.
    ///
    /// Pages are processed strictly in order, one extractor call per page. A
    /// page whose extractor reply cannot be parsed as a tag mapping is
    /// recorded as an empty chunk and processing continues; any other
    /// extractor failure aborts the document.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for non-PDF inputs, a loader error if the
    /// file cannot be read, or the extractor error that aborted processing.
    pub async fn generate(&self, path: &Path) -> Result<CatalogDocument, CatalogError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !self
            .loader
            .supported_extensions()
            .contains(&extension.as_str())
        {
            return Err(CatalogError::UnsupportedFormat(extension));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_owned();

        let pages = self.loader.load(path).await?;
        tracing::info!(file = %file_name, pages = pages.len(), "extracting tags");

        let mut document = CatalogDocument::new(file_name);
        for (index, page_text) in pages.iter().enumerate() {
            let tags = match (self.extract_fn)(page_text).await {
                Ok(tags) => tags,
                Err(LlmError::StructuredParse(reason)) => {
                    tracing::warn!(page = index, "unable to parse tag response: {reason}");
                    TagMap::new()
                }
                Err(e) => return Err(e.into()),
            };
            tracing::debug!(page = index, tags = tags.len(), "page recorded");
            document.record_page(index, tags)?;
        }

        document.finalize(pages.len())?;
        Ok(document)
    }
}
