use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;

/// Fixed schema-family identifier carried by every catalog document.
pub const CATALOG_NAME: &str = "MeData";

/// Tags extracted from one page, in extractor output order.
pub type TagMap = IndexMap<String, TagRecord>;

/// One extracted tag: a value plus supporting evidence. Extra fields the
/// extractor returned are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl TagRecord {
    #[must_use]
    pub fn new(value: impl Into<Value>, evidence: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            evidence: Some(evidence.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Metadata attached to one source page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based page number(s) this chunk covers; always a single page here.
    pub page_range: Vec<usize>,
    #[serde(flatten)]
    pub tags: TagMap,
}

/// The metadata document accumulated over all pages of one input file.
///
/// Field order matches the serialized template; the dynamic per-tag value
/// lists flatten to top-level keys after `chunks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub catalog_name: String,
    pub file_name: String,
    pub file_directory: Vec<String>,
    pub file_type: Vec<String>,
    pub page_count: Vec<usize>,
    pub storage_type: Vec<String>,
    pub last_modified: Vec<String>,
    pub chunks: IndexMap<String, Chunk>,
    /// For every tag name ever seen, the raw values in chunk order,
    /// one entry per chunk the tag appeared in.
    #[serde(flatten)]
    pub tag_values: IndexMap<String, Vec<Value>>,
}

impl CatalogDocument {
    /// Create a fresh document for one input file. There is no shared
    /// template; every file starts from its own document.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            catalog_name: CATALOG_NAME.to_owned(),
            file_name: file_name.into(),
            file_directory: Vec::new(),
            file_type: Vec::new(),
            page_count: Vec::new(),
            storage_type: vec!["local".to_owned()],
            last_modified: vec![Utc::now().to_rfc3339()],
            chunks: IndexMap::new(),
            tag_values: IndexMap::new(),
        }
    }

    /// Record the tags extracted from one page as chunk `page_index`.
    ///
    /// Inserts a chunk keyed by the stringified zero-based index with
    /// `page_range = [page_index + 1]`, stores each tag record verbatim, and
    /// appends each record's value (empty string when absent) to the
    /// document-level list for that tag. An empty `tags` map still records
    /// the chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is already finalized or the chunk id
    /// was recorded before.
    pub fn record_page(&mut self, page_index: usize, tags: TagMap) -> Result<(), CatalogError> {
        if self.is_finalized() {
            return Err(CatalogError::Finalized);
        }
        let chunk_id = page_index.to_string();
        if self.chunks.contains_key(&chunk_id) {
            return Err(CatalogError::DuplicateChunk(chunk_id));
        }

        for (name, record) in &tags {
            let value = record
                .value
                .clone()
                .unwrap_or_else(|| Value::String(String::new()));
            self.tag_values.entry(name.clone()).or_default().push(value);
        }

        self.chunks.insert(
            chunk_id,
            Chunk {
                page_range: vec![page_index + 1],
                tags,
            },
        );
        Ok(())
    }

    /// Set the page count and mark the document complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is already finalized or `pages` does
    /// not match the number of recorded chunks.
    pub fn finalize(&mut self, pages: usize) -> Result<(), CatalogError> {
        if self.is_finalized() {
            return Err(CatalogError::Finalized);
        }
        if pages != self.chunks.len() {
            return Err(CatalogError::PageCountMismatch {
                pages,
                chunks: self.chunks.len(),
            });
        }
        self.page_count = vec![pages];
        Ok(())
    }

    /// A document is finalized once its page count has been set.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        !self.page_count.is_empty()
    }

    /// Serialize with 4-space indentation, the format of the
    /// `metadata.json` artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, CatalogError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8(buf).expect("serde_json output is valid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn tags(entries: &[(&str, &str)]) -> TagMap {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_owned(), TagRecord::new(*value, "source text")))
            .collect()
    }

    #[test]
    fn new_document_has_template_defaults() {
        let doc = CatalogDocument::new("report.pdf");
        assert_eq!(doc.catalog_name, "MeData");
        assert_eq!(doc.file_name, "report.pdf");
        assert!(doc.file_directory.is_empty());
        assert!(doc.file_type.is_empty());
        assert!(doc.page_count.is_empty());
        assert_eq!(doc.storage_type, vec!["local"]);
        assert_eq!(doc.last_modified.len(), 1);
        assert!(doc.chunks.is_empty());
        assert!(!doc.is_finalized());
    }

    #[test]
    fn fresh_document_per_file() {
        let mut first = CatalogDocument::new("a.pdf");
        first
            .record_page(0, tags(&[("title", "Annual Report")]))
            .unwrap();

        let second = CatalogDocument::new("b.pdf");
        assert!(second.chunks.is_empty());
        assert!(second.tag_values.is_empty());
    }

    #[test]
    fn record_page_inserts_chunk_with_page_range() {
        let mut doc = CatalogDocument::new("report.pdf");
        doc.record_page(0, tags(&[("title", "Annual Report")]))
            .unwrap();
        doc.record_page(1, TagMap::new()).unwrap();

        assert_eq!(doc.chunks.len(), 2);
        assert_eq!(doc.chunks["0"].page_range, vec![1]);
        assert_eq!(doc.chunks["1"].page_range, vec![2]);
        assert!(doc.chunks["1"].tags.is_empty());
    }

    #[test]
    fn record_page_appends_tag_values_in_chunk_order() {
        let mut doc = CatalogDocument::new("report.pdf");
        doc.record_page(0, tags(&[("author", "Ada"), ("title", "Vol 1")]))
            .unwrap();
        doc.record_page(1, tags(&[("author", "Grace")])).unwrap();

        assert_eq!(
            doc.tag_values["author"],
            vec![Value::from("Ada"), Value::from("Grace")]
        );
        assert_eq!(doc.tag_values["title"], vec![Value::from("Vol 1")]);
    }

    #[test]
    fn missing_value_contributes_empty_string() {
        let mut doc = CatalogDocument::new("report.pdf");
        let mut map = TagMap::new();
        map.insert(
            "note".to_owned(),
            TagRecord {
                value: None,
                evidence: Some(Value::from("seen on page")),
                extra: serde_json::Map::new(),
            },
        );
        doc.record_page(0, map).unwrap();

        assert_eq!(doc.tag_values["note"], vec![Value::from("")]);
    }

    #[test]
    fn duplicate_chunk_rejected() {
        let mut doc = CatalogDocument::new("report.pdf");
        doc.record_page(0, TagMap::new()).unwrap();
        let result = doc.record_page(0, TagMap::new());
        assert!(matches!(result, Err(CatalogError::DuplicateChunk(id)) if id == "0"));
    }

    #[test]
    fn finalize_sets_page_count_once() {
        let mut doc = CatalogDocument::new("report.pdf");
        doc.record_page(0, TagMap::new()).unwrap();
        doc.finalize(1).unwrap();

        assert_eq!(doc.page_count, vec![1]);
        assert!(doc.is_finalized());
        assert!(matches!(doc.finalize(1), Err(CatalogError::Finalized)));
        assert!(matches!(
            doc.record_page(1, TagMap::new()),
            Err(CatalogError::Finalized)
        ));
    }

    #[test]
    fn finalize_validates_chunk_count() {
        let mut doc = CatalogDocument::new("report.pdf");
        doc.record_page(0, TagMap::new()).unwrap();
        let result = doc.finalize(3);
        assert!(matches!(
            result,
            Err(CatalogError::PageCountMismatch { pages: 3, chunks: 1 })
        ));
    }

    #[test]
    fn serialized_shape_matches_template() {
        let mut doc = CatalogDocument::new("invoice.pdf");
        doc.record_page(0, tags(&[("invoice_number", "INV-001")]))
            .unwrap();
        doc.record_page(1, TagMap::new()).unwrap();
        doc.finalize(2).unwrap();

        let json: Value = serde_json::from_str(&doc.to_pretty_json().unwrap()).unwrap();
        assert_eq!(json["catalog_name"], "MeData");
        assert_eq!(json["file_name"], "invoice.pdf");
        assert_eq!(json["page_count"], serde_json::json!([2]));
        assert_eq!(json["storage_type"], serde_json::json!(["local"]));
        assert_eq!(
            json["chunks"]["0"]["invoice_number"]["value"],
            Value::from("INV-001")
        );
        assert_eq!(json["chunks"]["1"], serde_json::json!({"page_range": [2]}));
        assert_eq!(json["invoice_number"], serde_json::json!(["INV-001"]));
    }

    #[test]
    fn pretty_json_uses_four_space_indent() {
        let doc = CatalogDocument::new("report.pdf");
        let json = doc.to_pretty_json().unwrap();
        assert!(json.contains("\n    \"catalog_name\""));
    }

    #[test]
    fn round_trip_preserves_structure() {
        let mut doc = CatalogDocument::new("report.pdf");
        let mut map = tags(&[("title", "Vol 1")]);
        map.insert(
            "pages".to_owned(),
            TagRecord {
                value: Some(Value::from(42)),
                evidence: None,
                extra: serde_json::Map::from_iter([(
                    "confidence".to_owned(),
                    Value::from(0.9),
                )]),
            },
        );
        doc.record_page(0, map).unwrap();
        doc.finalize(1).unwrap();

        let json = doc.to_pretty_json().unwrap();
        let parsed: CatalogDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);

        let raw: Value = serde_json::from_str(&json).unwrap();
        let again: Value = serde_json::from_str(
            &serde_json::to_string(&parsed).unwrap(),
        )
        .unwrap();
        assert_eq!(raw, again);
    }

    #[test]
    fn extra_fields_preserved_verbatim() {
        let raw = serde_json::json!({
            "value": "INV-001",
            "evidence": "header line",
            "confidence": 0.87
        });
        let record: TagRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.extra["confidence"], Value::from(0.87));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    proptest! {
        // Every tag list's length equals the number of chunks containing that
        // tag, and entries follow chunk order.
        #[test]
        fn tag_list_length_matches_occurrences(pages in proptest::collection::vec(
            proptest::collection::vec("[a-d]", 0..4),
            0..8,
        )) {
            let mut doc = CatalogDocument::new("prop.pdf");
            for (index, names) in pages.iter().enumerate() {
                let mut map = TagMap::new();
                for name in names {
                    map.insert(name.clone(), TagRecord::new(format!("v{index}"), ""));
                }
                doc.record_page(index, map).unwrap();
            }
            doc.finalize(pages.len()).unwrap();

            prop_assert_eq!(doc.chunks.len(), pages.len());
            for (name, values) in &doc.tag_values {
                let occurrences: Vec<_> = doc
                    .chunks
                    .values()
                    .filter(|chunk| chunk.tags.contains_key(name))
                    .collect();
                prop_assert_eq!(values.len(), occurrences.len());
                for (value, chunk) in values.iter().zip(&occurrences) {
                    prop_assert_eq!(Some(value), chunk.tags[name].value.as_ref());
                }
            }
        }
    }
}
