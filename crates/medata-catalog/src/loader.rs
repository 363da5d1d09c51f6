use std::path::Path;
use std::pin::Pin;

use crate::DEFAULT_MAX_FILE_SIZE;
use crate::error::CatalogError;

/// Turns an input file into per-page text, one entry per page in page order.
pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<String>, CatalogError>> + Send + '_>>;

    fn supported_extensions(&self) -> &[&str];
}

pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<String>, CatalogError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = std::fs::canonicalize(&path)?;

            let meta = tokio::fs::metadata(&path).await?;
            if meta.len() > max_size {
                return Err(CatalogError::FileTooLarge(meta.len()));
            }

            let pages = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_by_pages(&path)
                    .map_err(|e| CatalogError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| CatalogError::Io(std::io::Error::other(e)))??;

            Ok(pages)
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}
