use crate::config::Config;
use crate::error::ApiError;
use crate::models::Product;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// One product's embedding vector. A record is *valid* when the vector is
/// non-empty and every component is finite; anything else counts as "no
/// embedding" and is excluded from vector ranking.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub product_id: String,
    pub vector: Vec<f32>,
}

impl EmbeddingRecord {
    pub fn is_valid(&self) -> bool {
        !self.vector.is_empty() && self.vector.iter().all(|x| x.is_finite())
    }
}

/// Read-only store of per-product embeddings, loaded once at startup.
///
/// Two equivalent source shapes exist in the deployment: a bundled JSON
/// artifact of `{ProductID, embedding}` pairs, and an `embeddings` column on
/// the catalog rows. Both reduce to the same records here; insertion order
/// is preserved because it is the tie-break order for ranking.
#[derive(Debug)]
pub struct EmbeddingStore {
    records: Vec<EmbeddingRecord>,
    index: HashMap<String, usize>,
    available: bool,
}

// Artifact rows carry ProductID as number or string depending on the export.
fn deserialize_artifact_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Int(i) => Ok(i.to_string()),
    }
}

#[derive(Deserialize)]
struct ArtifactRecord {
    #[serde(rename = "ProductID", deserialize_with = "deserialize_artifact_id")]
    product_id: String,
    #[serde(default)]
    embedding: Vec<f32>,
}

impl EmbeddingStore {
    /// Load from the configured source. A failed file load is the
    /// `DataUnavailable` condition: logged once here, and the store answers
    /// "unavailable" for the rest of the process so every request degrades
    /// to keyword fallback.
    pub fn load(config: &Config, catalog_products: &[Product]) -> Self {
        let store = match &config.embeddings_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::from_catalog(catalog_products)),
        };

        match store {
            Ok(store) => {
                info!(
                    records = store.len(),
                    valid = store.all_valid().count(),
                    "Embedding store loaded"
                );
                store
            }
            Err(reason) => {
                warn!(
                    "Embedding source unavailable, vector ranking disabled for this session: {}",
                    reason
                );
                Self::unavailable()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ApiError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ApiError::DataUnavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        let records: Vec<ArtifactRecord> = serde_json::from_str(&raw).map_err(|e| {
            ApiError::DataUnavailable(format!("failed to parse {}: {}", path.display(), e))
        })?;

        Ok(Self::from_records(records.into_iter().map(|r| {
            EmbeddingRecord {
                product_id: r.product_id,
                vector: r.embedding,
            }
        })))
    }

    /// Harvest the `embeddings` column off catalog rows. Rows without the
    /// column simply have no embedding.
    pub fn from_catalog(products: &[Product]) -> Self {
        Self::from_records(products.iter().filter_map(|p| {
            p.embedding.as_ref().map(|vector| EmbeddingRecord {
                product_id: p.id.clone(),
                vector: vector.clone(),
            })
        }))
    }

    pub fn from_records(records: impl IntoIterator<Item = EmbeddingRecord>) -> Self {
        let mut store = Self {
            records: Vec::new(),
            index: HashMap::new(),
            available: true,
        };

        for record in records {
            // First record wins on duplicate ids; the index keeps lookups
            // and the no-duplicates result invariant honest.
            if store.index.contains_key(&record.product_id) {
                continue;
            }
            store
                .index
                .insert(record.product_id.clone(), store.records.len());
            store.records.push(record);
        }

        store
    }

    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            available: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn get(&self, product_id: &str) -> Option<&EmbeddingRecord> {
        self.index.get(product_id).map(|&i| &self.records[i])
    }

    /// Candidate pool for vector ranking, in insertion order.
    pub fn all_valid(&self) -> impl Iterator<Item = &EmbeddingRecord> {
        self.records.iter().filter(|r| r.is_valid())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, vector: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            product_id: id.to_string(),
            vector,
        }
    }

    #[test]
    fn all_valid_skips_empty_and_non_finite_vectors() {
        let store = EmbeddingStore::from_records([
            record("1", vec![1.0, 0.0]),
            record("2", vec![]),
            record("3", vec![f32::NAN, 0.0]),
            record("4", vec![0.0, 1.0]),
        ]);

        let valid: Vec<&str> = store.all_valid().map(|r| r.product_id.as_str()).collect();
        assert_eq!(valid, vec!["1", "4"]);
        // Invalid records still resolve by id; they just never rank.
        assert!(store.get("2").is_some());
    }

    #[test]
    fn preserves_insertion_order_and_drops_duplicate_ids() {
        let store = EmbeddingStore::from_records([
            record("b", vec![1.0]),
            record("a", vec![2.0]),
            record("b", vec![9.0]),
        ]);

        let ids: Vec<&str> = store.all_valid().map(|r| r.product_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(store.get("b").unwrap().vector, vec![1.0]);
    }

    #[test]
    fn harvests_catalog_embedding_columns() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"ProductID": 1, "embeddings": [0.5, 0.5]},
                {"ProductID": 2},
                {"ProductID": 3, "embeddings": []}
            ]"#,
        )
        .unwrap();

        let store = EmbeddingStore::from_catalog(&products);
        assert_eq!(store.len(), 2);
        assert!(store.get("1").unwrap().is_valid());
        assert!(store.get("2").is_none());
        assert!(!store.get("3").unwrap().is_valid());
    }

    #[test]
    fn missing_artifact_marks_store_unavailable() {
        let result = EmbeddingStore::load_from_file(Path::new("/nonexistent/embeddings.json"));
        assert!(result.is_err());

        let store = EmbeddingStore::unavailable();
        assert!(!store.is_available());
        assert_eq!(store.all_valid().count(), 0);
    }
}
