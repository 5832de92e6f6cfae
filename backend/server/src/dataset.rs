//! # Dataset
//!
//! Read-only reference data behind every search.
//!
//! ## Shape
//! - JSON array of documents
//! - Fields: url (**string**), title (**string**), text (**string**), all required
//! - Extra fields are ignored
//!
//! ## Lifetime
//! - Loaded once at startup, either from `DATASET_PATH` or the copy bundled into the binary
//! - Held as `Arc<[Document]>` so every request shares it without locking
//! - Insertion order is kept, results are always returned in this order
use std::{fs::read_to_string, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

const BUNDLED_DATASET: &str = include_str!("../data/database.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub text: String,
}

pub type Dataset = Arc<[Document]>;

pub fn load_dataset(path: Option<&Path>) -> Result<Dataset, ConfigError> {
    let dataset = match path {
        Some(path) => {
            info!("Loading dataset from {}", path.display());

            let raw = read_to_string(path).map_err(|source| ConfigError::DatasetRead {
                path: path.to_path_buf(),
                source,
            })?;

            parse_dataset(&raw)?
        }
        None => {
            info!("DATASET_PATH not set, using bundled dataset");

            parse_dataset(BUNDLED_DATASET)?
        }
    };

    info!("Loaded {} documents", dataset.len());

    Ok(dataset)
}

pub fn parse_dataset(raw: &str) -> Result<Dataset, ConfigError> {
    let documents: Vec<Document> = serde_json::from_str(raw)?;

    Ok(documents.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_dataset_loads() {
        let dataset = load_dataset(None).unwrap();

        assert!(!dataset.is_empty());
        assert_eq!(dataset[0].url, "https://www.google.com");
    }

    #[test]
    fn test_preserves_order() {
        let dataset = parse_dataset(
            r#"[
                {"url": "https://b.example", "title": "b", "text": "b"},
                {"url": "https://a.example", "title": "a", "text": "a"}
            ]"#,
        )
        .unwrap();

        assert_eq!(dataset[0].url, "https://b.example");
        assert_eq!(dataset[1].url, "https://a.example");
    }

    #[test]
    fn test_ignores_extra_fields() {
        let dataset =
            parse_dataset(r#"[{"url": "u", "title": "t", "text": "x", "rank": 3}]"#).unwrap();

        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_rejects_missing_field() {
        let result = parse_dataset(r#"[{"url": "u", "title": "t"}]"#);

        assert!(matches!(result, Err(ConfigError::DatasetParse(_))));
    }

    #[test]
    fn test_rejects_non_array() {
        let result = parse_dataset(r#"{"url": "u", "title": "t", "text": "x"}"#);

        assert!(matches!(result, Err(ConfigError::DatasetParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_dataset(Some(Path::new("/nonexistent/database.json")));

        assert!(matches!(result, Err(ConfigError::DatasetRead { .. })));
    }
}
